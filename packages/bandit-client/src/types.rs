use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string field that the service may send as `null`.
///
/// Distinguishes three wire states: absent or `null` (invalid), `""` (valid,
/// empty) and any other string (valid). Any other JSON type fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullableString {
    valid: bool,
    value: String,
}

impl NullableString {
    /// The invalid state. The value is always empty.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self {
            valid: true,
            value: value.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The value, or `""` when invalid.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.valid.then_some(self.value.as_str())
    }

    pub fn into_option(self) -> Option<String> {
        self.valid.then_some(self.value)
    }
}

impl From<Option<String>> for NullableString {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::null(),
        }
    }
}

impl<'de> Deserialize<'de> for NullableString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for NullableString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_deref().serialize(serializer)
    }
}

/// A variant assignment returned by the suggest endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "variant_id")]
    pub variant_code: String,
    #[serde(rename = "experiment_id")]
    pub experiment_code: String,
    #[serde(default)]
    pub content: NullableString,
    #[serde(default)]
    pub reward_token: NullableString,
}

impl Suggestion {
    /// Whether a later reward call is possible for this suggestion.
    pub fn is_rewardable(&self) -> bool {
        self.reward_token.is_valid()
    }
}

/// A reward to report for a previously suggested variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub token: String,
}

impl Reward {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}
