//! Field rules for games, proposals and registrations.
//!
//! All checks run before any remote call so that a rejected form never reaches
//! the gateway.

use crate::{
    errors::{Error, Result},
    models::{GameDraft, NewUser},
};

/// Minimum recommended ages a game may carry.
pub const ALLOWED_AGES: [i32; 6] = [3, 6, 9, 12, 16, 18];

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_DEVELOPER_LEN: usize = 100;
const MAX_ALT_LEN: usize = 250;
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 250;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=50;

fn check_length(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(Error::validation(field, "is required"));
    }
    if len > max {
        return Err(Error::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Rules every game must satisfy, whatever its origin.
pub fn validate_game_fields(draft: &GameDraft) -> Result<()> {
    check_length("title", &draft.title, MAX_TITLE_LEN)?;
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(Error::validation("price", "must be a non-negative number"));
    }
    if !ALLOWED_AGES.contains(&draft.min_age) {
        return Err(Error::validation(
            "min_age",
            format!("must be one of {ALLOWED_AGES:?}"),
        ));
    }
    if draft.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::validation(
            "description",
            format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        ));
    }
    if let Some(alt) = &draft.cover_alt {
        if alt.chars().count() > MAX_ALT_LEN {
            return Err(Error::validation(
                "cover_alt",
                format!("must be at most {MAX_ALT_LEN} characters"),
            ));
        }
    }
    Ok(())
}

/// Stricter rules for user submissions: description, developer, at least one genre
/// and at least one platform are mandatory.
pub fn validate_proposal(draft: &GameDraft) -> Result<()> {
    validate_game_fields(draft)?;
    check_length("description", &draft.description, MAX_DESCRIPTION_LEN)?;
    check_length("developer", &draft.developer, MAX_DEVELOPER_LEN)?;
    if draft.genres.is_empty() {
        return Err(Error::validation("genres", "select at least one genre"));
    }
    if draft.platforms.is_empty() {
        return Err(Error::validation("platforms", "select at least one platform"));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !domain.starts_with('.')
        }
        _ => false,
    }
}

/// Registration form rules.
pub fn validate_registration(user: &NewUser) -> Result<()> {
    check_length("name", &user.name, MAX_NAME_LEN)?;

    let email = user.email.trim();
    if email.chars().count() > MAX_EMAIL_LEN || !is_plausible_email(email) {
        return Err(Error::validation("email", "enter a valid email address"));
    }

    if !PASSWORD_LEN.contains(&user.password.chars().count()) {
        return Err(Error::validation(
            "password",
            format!(
                "must be between {} and {} characters",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            ),
        ));
    }
    Ok(())
}

/// Removes anything that looks like an HTML tag from free text.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        output.push_str(&rest[..start]);
        match rest[start..].find('>') {
            // A tag needs at least one character between the brackets.
            Some(end) if end > 1 => rest = &rest[start + end + 1..],
            _ => {
                output.push('<');
                rest = &rest[start + 1..];
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use crate::entities::IdSet;
    use crate::test_utils::test_draft;

    fn new_user(name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            avatar: None,
            preferences: IdSet::new(),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_proposal(&test_draft("Aventura")).is_ok());
    }

    #[test]
    fn test_proposal_rules() {
        let cases: Vec<(&str, Box<dyn Fn(&mut GameDraft)>)> = vec![
            ("title", Box::new(|d| d.title = "x".repeat(101))),
            ("price", Box::new(|d| d.price = f64::NAN)),
            ("price", Box::new(|d| d.price = -0.5)),
            ("min_age", Box::new(|d| d.min_age = 0)),
            ("description", Box::new(|d| d.description = String::new())),
            ("developer", Box::new(|d| d.developer = "  ".to_string())),
            ("genres", Box::new(|d| d.genres = IdSet::new())),
            ("platforms", Box::new(|d| d.platforms = IdSet::new())),
            ("cover_alt", Box::new(|d| d.cover_alt = Some("a".repeat(251)))),
        ];
        for (expected, mutate) in cases {
            let mut draft = test_draft("Aventura");
            mutate(&mut draft);
            match validate_proposal(&draft) {
                Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to fail, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_direct_games_may_omit_developer_and_genres() {
        let mut draft = test_draft("Aventura");
        draft.developer = String::new();
        draft.genres = IdSet::new();
        draft.description = String::new();
        assert!(validate_game_fields(&draft).is_ok());
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration(&new_user("Uxía", "uxia@example.org", "contrasinal")).is_ok());

        let bad = [
            (new_user("", "a@b.org", "contrasinal"), "name"),
            (new_user("Uxía", "no-at-sign", "contrasinal"), "email"),
            (new_user("Uxía", "a@@b.org", "contrasinal"), "email"),
            (new_user("Uxía", "@b.org", "contrasinal"), "email"),
            (new_user("Uxía", "a@b.org", "curta"), "password"),
            (new_user("Uxía", "a@b.org", &"p".repeat(51)), "password"),
        ];
        for (user, expected) in bad {
            match validate_registration(&user) {
                Err(Error::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to fail, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Ola</b> mundo"), "Ola mundo");
        assert_eq!(strip_tags("a <script>x</script>b"), "a xb");
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_tags("<> stays"), "<> stays");
        assert_eq!(strip_tags("dangling <"), "dangling <");
    }
}
