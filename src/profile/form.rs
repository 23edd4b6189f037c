//! Submitted profile fields and their validation.
//!
//! Neither form has an owner field: the owner comes from the request context,
//! and anything else a client sends under that name is dropped during deserialization.

use crate::error::{AppError, AppResult};

use std::borrow::Cow;

const NICKNAME_MAX_CHARS: usize = 100;
const LOGIN_MAX_CHARS: usize = 150;
const ABOUT_MAX_CHARS: usize = 2000;
const AGE_RANGE: std::ops::RangeInclusive<i32> = 0..=150;

#[derive(serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(default)]
pub struct ProfileForm {
    pub nickname: String,
    pub login: String,
    pub age: Option<i32>,
    pub about: String,
}

#[derive(serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(default)]
pub struct ProfileEditForm {
    pub nickname: Option<String>,
    pub login: Option<String>,
    /// Absent keeps the stored age, `null` clears it.
    #[serde(
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Option<i32>>,
    pub about: Option<String>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

/// Validated fields of a profile about to be created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewProfile {
    pub nickname: String,
    pub login: String,
    pub age: Option<i32>,
    pub about: String,
}

/// Validated changes. `None` leaves the stored value as it is.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub login: Option<String>,
    /// `Some(None)` clears the age.
    pub age: Option<Option<i32>>,
    pub about: Option<String>,
}

#[derive(Default)]
struct Errors(Vec<(&'static str, Cow<'static, str>)>);

impl Errors {
    fn add(&mut self, field: &'static str, message: impl Into<Cow<'static, str>>) {
        self.0.push((field, message.into()));
    }

    fn into_result<T>(self, value: T) -> AppResult<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AppError::validation(self.0))
        }
    }
}

impl ProfileForm {
    pub fn validate(self) -> AppResult<NewProfile> {
        let mut errors = Errors::default();

        let nickname = clean_nickname(&self.nickname, &mut errors);
        let login = clean_login(&self.login, &mut errors);
        check_age(self.age, &mut errors);
        let about = clean_about(&self.about, &mut errors);

        errors.into_result(NewProfile {
            nickname,
            login,
            age: self.age,
            about,
        })
    }
}

impl ProfileEditForm {
    pub fn validate(self) -> AppResult<ProfileChanges> {
        let mut errors = Errors::default();

        let nickname = self
            .nickname
            .map(|nickname| clean_nickname(&nickname, &mut errors));
        let login = self.login.map(|login| clean_login(&login, &mut errors));
        check_age(self.age.flatten(), &mut errors);
        let about = self.about.map(|about| clean_about(&about, &mut errors));

        errors.into_result(ProfileChanges {
            nickname,
            login,
            age: self.age,
            about,
        })
    }
}

fn clean_nickname(raw: &str, errors: &mut Errors) -> String {
    let nickname = raw.trim();
    if nickname.is_empty() {
        errors.add("nickname", "may not be blank");
    } else if nickname.chars().count() > NICKNAME_MAX_CHARS {
        errors.add(
            "nickname",
            format!("may not be longer than {NICKNAME_MAX_CHARS} characters"),
        );
    }
    nickname.to_string()
}

fn clean_login(raw: &str, errors: &mut Errors) -> String {
    let login = raw.trim();
    if login.is_empty() {
        errors.add("login", "may not be blank");
        return String::new();
    }
    if login.chars().count() > LOGIN_MAX_CHARS {
        errors.add(
            "login",
            format!("may not be longer than {LOGIN_MAX_CHARS} characters"),
        );
    }
    if !login.chars().all(is_login_char) {
        errors.add(
            "login",
            "may only contain letters, digits and @/./+/-/_ characters",
        );
    }
    login.to_string()
}

fn is_login_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn check_age(age: Option<i32>, errors: &mut Errors) {
    if let Some(age) = age {
        if !AGE_RANGE.contains(&age) {
            errors.add(
                "age",
                format!(
                    "must be between {} and {}",
                    AGE_RANGE.start(),
                    AGE_RANGE.end()
                ),
            );
        }
    }
}

fn clean_about(raw: &str, errors: &mut Errors) -> String {
    let about = raw.trim();
    if about.chars().count() > ABOUT_MAX_CHARS {
        errors.add(
            "about",
            format!("may not be longer than {ABOUT_MAX_CHARS} characters"),
        );
    }
    about.to_string()
}
