#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Minimal shape check: a non-empty local part, exactly one `@`, no whitespace,
    /// and a `.` in the domain with at least one character on each side of it.
    /// Deliverability is not checked.
    pub fn parse(s: String) -> Result<Self, String> {
        if s.chars().any(char::is_whitespace) {
            return Err(format!("{s:?} is not a valid subscriber email."));
        }

        let Some((local, domain)) = s.split_once('@') else {
            return Err(format!("{s} is not a valid subscriber email."));
        };

        let has_inner_dot = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

        if local.is_empty() || domain.contains('@') || !has_inner_dot {
            return Err(format!("{s} is not a valid subscriber email."));
        }

        Ok(Self(s))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubscriberEmail::parse(value)
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
