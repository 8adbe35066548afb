use serde_json::Value;

/// Field names that may carry the submitted address, in the order they are checked.
pub const EMAIL_ALIASES: [&str; 4] = ["email", "Email", "email-address", "emailAddress"];

/// The decoded form submission: field names and their textual values, in received order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubscriptionRequest {
    fields: Vec<(String, Option<String>)>,
}

impl SubscriptionRequest {
    /// Decodes a JSON object body. Anything other than an object yields an empty request.
    pub fn from_json(body: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let fields = map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    Value::Null | Value::Array(_) | Value::Object(_) => None,
                };
                (name, value)
            })
            .collect();

        Self { fields }
    }

    /// Decodes an `application/x-www-form-urlencoded` body. Undecodable input yields an empty request.
    pub fn from_form(body: &[u8]) -> Self {
        let fields = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(|pairs| pairs.into_iter().map(|(k, v)| (k, Some(v))).collect())
            .unwrap_or_default();

        Self { fields }
    }

    /// Field names in the order they were received.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    /// The value under the first alias in [`EMAIL_ALIASES`] that carries a non-empty value.
    pub fn email(&self) -> Option<&str> {
        EMAIL_ALIASES.iter().find_map(|alias| self.value(alias))
    }

    /// First non-empty value among repeated occurrences of `name`.
    fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter(|(field, _)| field == name)
            .find_map(|(_, value)| value.as_deref().filter(|value| !value.is_empty()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubscriptionRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}
