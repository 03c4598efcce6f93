use lms_core::models::CurrentUser;

#[cfg(target_arch = "wasm32")]
const TOKEN_KEY: &str = "lms_token";
#[cfg(target_arch = "wasm32")]
const USER_KEY: &str = "lms_user";

/// Токен из хранилища или поля ввода.
pub(crate) fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_user(raw: &str) -> Option<CurrentUser> {
    serde_json::from_str::<CurrentUser>(raw).ok()
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_token() -> Option<String> {
    let raw = local_storage().ok()?.get_item(TOKEN_KEY).ok()??;
    parse_token(&raw)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_user() -> Option<CurrentUser> {
    let raw = local_storage().ok()?.get_item(USER_KEY).ok()??;
    parse_user(&raw)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn save_session(token: &str, user: &CurrentUser) -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .set_item(TOKEN_KEY, token)
        .map_err(|_| "failed to save token".to_string())?;

    let raw = serde_json::to_string(user).map_err(|_| "failed to serialize user".to_string())?;
    storage
        .set_item(USER_KEY, &raw)
        .map_err(|_| "failed to save user".to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn clear_session() -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .remove_item(TOKEN_KEY)
        .map_err(|_| "failed to clear token".to_string())?;
    storage
        .remove_item(USER_KEY)
        .map_err(|_| "failed to clear user".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_trims_and_returns_value() {
        let token = parse_token("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_rejects_blank() {
        assert!(parse_token("   ").is_none());
        assert!(parse_token("\n").is_none());
    }

    #[test]
    fn parse_user_returns_none_for_invalid_json() {
        assert!(parse_user("{not-json}").is_none());
    }

    #[test]
    fn parse_user_reads_role() {
        let raw = r#"{"id":7,"email":"t@example.com","full_name":"Teacher","role":"instructor"}"#;
        let user = parse_user(raw).expect("user should parse");
        assert_eq!(user.id, 7);
        assert_eq!(user.role, "instructor");
        assert!(!user.is_admin());
    }
}
