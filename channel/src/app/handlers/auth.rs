//! # Authentication Handlers
//!
//! Sign-in and sign-up submission. Both validate locally first and only hit
//! the backend when every field passes.

use shared::{LoginCredentials, RegisterData};

use crate::app::router::Route;
use crate::app::state::{LoginForm, RegisterForm};
use crate::bridge::session::SessionBridge;
use crate::core::service::Navigator;
use crate::utils::validation::{validate_login, validate_registration};

/// Submit the sign-in form. Returns true when the user is now signed in.
pub async fn submit_login(
    session: &SessionBridge,
    navigator: &dyn Navigator,
    form: &mut LoginForm,
) -> bool {
    form.form_error = None;
    form.errors = validate_login(&form.email, &form.password);
    if !form.errors.is_empty() {
        return false;
    }

    let credentials = LoginCredentials {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };

    form.is_submitting = true;
    let result = session.login(&credentials).await;
    form.is_submitting = false;

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Signed in");
            form.password.clear();
            navigator.navigate(Route::Dashboard);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign in failed");
            form.form_error = Some(e.to_string());
            false
        }
    }
}

/// Submit the sign-up form. Returns true when the new account is signed in.
pub async fn submit_register(
    session: &SessionBridge,
    navigator: &dyn Navigator,
    form: &mut RegisterForm,
) -> bool {
    form.form_error = None;
    form.errors = validate_registration(
        &form.name,
        &form.email,
        &form.password,
        &form.confirm_password,
    );
    if !form.errors.is_empty() {
        return false;
    }

    let data = RegisterData {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        name: form.name.trim().to_string(),
    };

    form.is_submitting = true;
    let result = session.register(&data).await;
    form.is_submitting = false;

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Account created");
            form.password.clear();
            form.confirm_password.clear();
            navigator.navigate(Route::Dashboard);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign up failed");
            form.form_error = Some(e.to_string());
            false
        }
    }
}

/// Sign out and go back to the sign-in page
pub async fn sign_out(session: &SessionBridge, navigator: &dyn Navigator) {
    session.logout().await;
    navigator.navigate(Route::Login);
}
