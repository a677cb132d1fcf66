//! Portal endpoint paths.

/// Login endpoint (public).
pub const LOGIN: &str = "/user/login";
/// Registration endpoint (public).
pub const REGISTER: &str = "/user/register";
/// Full directory listing.
pub const LIST: &str = "/user/list";
/// User creation (multipart form).
pub const ADD: &str = "/user/add";
/// User update (multipart form).
pub const UPDATE: &str = "/user/update";
/// Avatar upload (multipart form).
pub const UPDATE_PROFILE_IMAGE: &str = "/user/update-profile-image";

/// Path of the password reset trigger for the given email.
pub fn reset_password(email: &str) -> String {
    format!("/user/reset-password/{email}")
}

/// Path of the delete endpoint for the given username.
pub fn delete(username: &str) -> String {
    format!("/user/delete/{username}")
}

/// Whether a path must be callable without a bearer token.
///
/// Login and registration are the only requests that have to succeed
/// before a token exists.
pub fn is_public(path: &str) -> bool {
    path == LOGIN || path == REGISTER
}
