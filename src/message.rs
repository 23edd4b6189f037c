use std::borrow::Cow;

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
}

/// A transient message for the user, delivered with the response it belongs to.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub message: Cow<'static, str>,
}

impl Notice {
    pub fn success(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_level_in_lowercase() {
        assert_eq!(
            serde_json::json!({ "level": "success", "message": "done" }),
            serde_json::to_value(Notice::success("done")).unwrap()
        );
    }
}
