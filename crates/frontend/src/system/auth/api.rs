use contracts::system::auth::{
    AuthResponse, ChangePasswordRequest, ChangePasswordResponse, LoginRequest, RegisterRequest,
};

use crate::shared::http::{ApiClient, ApiError};

/// Sign in with e-mail and password
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    client.post_json("/login", request).await
}

/// Create an account; the backend signs the new user in right away
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    client.post_json("/register", request).await
}

/// Change the signed-in user's password
pub async fn change_password(
    client: &ApiClient,
    request: &ChangePasswordRequest,
) -> Result<ChangePasswordResponse, ApiError> {
    client.post_json("/change-password", request).await
}
