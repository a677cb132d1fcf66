//! The user directory: listing, search, pagination, and mutations.

use std::path::Path;

use chrono::Utc;
use reqwest::Method;
use reqwest::multipart::Form;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};
use validator::Validate;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;
use staffhub_core::types::pagination::{PageRequest, PageResponse};
use staffhub_entity::user::User;
use staffhub_session::SessionManager;

use crate::api::ApiClient;
use crate::dto::UserForm;
use crate::routes;
use crate::upload::{self, UploadEvent};

/// Client-side view of the portal's user directory.
///
/// Reads hit the portal only through [`load_users`](Self::load_users);
/// search and pagination work on the cached snapshot, like the original
/// directory screen. Every successful mutation re-fetches the list
/// instead of patching the cache optimistically.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    /// Portal HTTP access.
    api: ApiClient,
    /// Session holding the cached list and the signed-in user.
    manager: SessionManager,
}

impl UserDirectory {
    /// Creates a directory over the given API client and session.
    pub fn new(api: ApiClient, manager: SessionManager) -> Self {
        Self { api, manager }
    }

    /// Fetches the full user list from the portal and replaces the
    /// cached snapshot.
    pub async fn load_users(&self) -> AppResult<Vec<User>> {
        let builder = self.api.request(Method::GET, routes::LIST).await?;
        let response = self.api.execute(builder).await?;
        let users: Vec<User> = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid user list response", e)
        })?;
        self.manager.save_users(&users).await?;
        debug!(count = users.len(), "Loaded user directory");
        Ok(users)
    }

    /// Returns the cached snapshot, or an empty list when nothing has
    /// been fetched yet.
    pub async fn cached_users(&self) -> AppResult<Vec<User>> {
        Ok(self.manager.users().await?.unwrap_or_default())
    }

    /// Searches the cached snapshot.
    ///
    /// Case-insensitive substring match over first name, last name,
    /// username, and user ID. An empty term, or a term matching no one,
    /// returns the full cached list: the screen falls back to showing
    /// everyone rather than an empty table.
    pub async fn search(&self, term: &str) -> AppResult<Vec<User>> {
        let all = self.cached_users().await?;
        if term.trim().is_empty() {
            return Ok(all);
        }
        let results: Vec<User> = all.iter().filter(|user| user.matches(term)).cloned().collect();
        if results.is_empty() {
            return Ok(all);
        }
        Ok(results)
    }

    /// Returns one page of the cached snapshot.
    pub async fn page(&self, request: &PageRequest) -> AppResult<PageResponse<User>> {
        Ok(PageResponse::paginate(self.cached_users().await?, request))
    }

    /// Creates a user via the multipart add endpoint, then re-fetches
    /// the list.
    pub async fn add_user(&self, form: &UserForm) -> AppResult<User> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let multipart = self.user_form_data(None, form).await?;
        let builder = self.api.request(Method::POST, routes::ADD).await?;
        let response = self.api.execute(builder.multipart(multipart)).await?;
        let user: User = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid add user response", e)
        })?;
        info!(username = %user.username, "Added user");
        self.load_users().await?;
        Ok(user)
    }

    /// Updates a user via the multipart update endpoint, then re-fetches
    /// the list.
    ///
    /// `current_username` names the record being changed; the form may
    /// carry a different username to rename the account.
    pub async fn update_user(&self, current_username: &str, form: &UserForm) -> AppResult<User> {
        form.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let multipart = self.user_form_data(Some(current_username), form).await?;
        let builder = self.api.request(Method::PUT, routes::UPDATE).await?;
        let response = self.api.execute(builder.multipart(multipart)).await?;
        let user: User = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid update user response", e)
        })?;
        info!(username = %user.username, "Updated user");
        self.load_users().await?;
        Ok(user)
    }

    /// Updates the signed-in user's own record and refreshes the cached
    /// profile along with the list.
    pub async fn update_own_profile(&self, form: &UserForm) -> AppResult<User> {
        let current = self.manager.user().await?.ok_or_else(|| {
            AppError::session("No signed-in user in the session")
        })?;
        let user = self.update_user(&current.username, form).await?;
        self.manager.save_user(&user).await?;
        Ok(user)
    }

    /// Deletes a user by username, then re-fetches the list.
    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        let builder = self
            .api
            .request(Method::DELETE, &routes::delete(username))
            .await?;
        self.api.execute(builder).await?;
        info!(username, "Deleted user");
        self.load_users().await?;
        Ok(())
    }

    /// Asks the portal to email a password reset to the given address.
    pub async fn reset_password(&self, email: &str) -> AppResult<()> {
        let builder = self
            .api
            .request(Method::GET, &routes::reset_password(email))
            .await?;
        self.api.execute(builder).await?;
        info!(email, "Requested password reset");
        Ok(())
    }

    /// Uploads a new avatar for `username`, streaming the file and
    /// reporting progress on `events`.
    ///
    /// On success the returned user's avatar URL gains a cache-busting
    /// `?time=` parameter so a stale image can never be displayed, a
    /// final `Done` event is emitted, and the cached profile is updated
    /// when the target is the signed-in user.
    pub async fn upload_avatar(
        &self,
        username: &str,
        image: &Path,
        events: UnboundedSender<UploadEvent>,
    ) -> AppResult<User> {
        let part = upload::counting_file_part(image, events.clone()).await?;
        let multipart = Form::new()
            .text("username", username.to_string())
            .part("profileImage", part);

        let builder = self
            .api
            .request(Method::PUT, routes::UPDATE_PROFILE_IMAGE)
            .await?;
        let response = self.api.execute(builder.multipart(multipart)).await?;
        let mut user: User = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid avatar upload response", e)
        })?;

        if let Some(url) = user.profile_image_url.take() {
            user.profile_image_url = Some(bust_cache(&url));
        }

        let signed_in = self.manager.user().await?;
        if signed_in.is_some_and(|current| current.username == user.username) {
            self.manager.save_user(&user).await?;
        }

        info!(username = %user.username, "Avatar updated");
        let _ = events.send(UploadEvent::Done);
        Ok(user)
    }

    /// Whether the signed-in user has admin privileges.
    pub async fn is_admin(&self) -> AppResult<bool> {
        Ok(self
            .manager
            .user()
            .await?
            .is_some_and(|user| user.is_admin()))
    }

    /// Whether the signed-in user is an admin or a manager.
    pub async fn is_admin_or_manager(&self) -> AppResult<bool> {
        Ok(self
            .manager
            .user()
            .await?
            .is_some_and(|user| user.is_admin_or_manager()))
    }

    /// Builds the multipart form shared by the add and update endpoints.
    ///
    /// Booleans are transmitted as `"true"`/`"false"` strings under the
    /// portal's `isActive`/`isNotLocked` field names.
    async fn user_form_data(
        &self,
        current_username: Option<&str>,
        form: &UserForm,
    ) -> AppResult<Form> {
        let mut multipart = Form::new();
        if let Some(current) = current_username {
            multipart = multipart.text("currentUsername", current.to_string());
        }
        multipart = multipart
            .text("firstName", form.first_name.clone())
            .text("lastName", form.last_name.clone())
            .text("username", form.username.clone())
            .text("email", form.email.clone())
            .text("role", form.role.to_string())
            .text("isActive", form.active.to_string())
            .text("isNotLocked", form.not_locked.to_string());
        if let Some(path) = &form.profile_image {
            multipart = multipart.part("profileImage", upload::file_part(path).await?);
        }
        Ok(multipart)
    }
}

/// Appends the cache-busting `?time=` parameter to an avatar URL.
fn bust_cache(url: &str) -> String {
    format!("{url}?time={}", Utc::now().timestamp_millis())
}
