//! Authentication route handlers
//!
//! - Single-step and OTP-confirmed registration
//! - Password login, single-step or confirmed with an emailed code
//! - Token refresh and logout
//! - Password reset and the current user

pub mod login;
pub mod logout;
pub mod me;
pub mod password;
pub mod refresh;
pub mod register;

use actix_web::web;

/// Mount the handlers under the `/auth` scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register::register))
        .route("/register/init", web::post().to(register::register_init))
        .route("/register/complete", web::post().to(register::register_complete))
        .route("/login", web::post().to(login::login))
        .route("/login/init", web::post().to(login::login_init))
        .route("/login/complete", web::post().to(login::login_complete))
        .route("/refresh-token", web::post().to(refresh::refresh_token))
        .route("/logout", web::post().to(logout::logout))
        .route("/forgot-password", web::post().to(password::forgot_password))
        .route("/me", web::get().to(me::me));
}
