//! Shared seed helpers for db integration tests.

use ausverity_core::roles::{ROLE_FIRM_OWNER, ROLE_LAWYER};
use sqlx::PgPool;

use ausverity_db::models::firm::{CreateFirmProfile, FirmProfile};
use ausverity_db::models::lawyer::{CreateLawyerProfile, LawyerProfile};
use ausverity_db::models::user::{CreateUser, User};
use ausverity_db::repositories::{FirmRepo, LawyerRepo, UserRepo};

pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "argon2-hash-placeholder".to_string(),
            full_name: "Test User".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("seed user")
}

pub async fn seed_lawyer(pool: &PgPool, email: &str, name: &str) -> (User, LawyerProfile) {
    let user = seed_user(pool, email, ROLE_LAWYER).await;
    let profile = LawyerRepo::create(
        pool,
        &CreateLawyerProfile {
            user_id: user.id,
            display_name: name.to_string(),
        },
    )
    .await
    .expect("seed lawyer profile");
    (user, profile)
}

pub async fn seed_firm(pool: &PgPool, email: &str, name: &str) -> (User, FirmProfile) {
    let user = seed_user(pool, email, ROLE_FIRM_OWNER).await;
    let firm = FirmRepo::create(
        pool,
        &CreateFirmProfile {
            owner_user_id: user.id,
            name: name.to_string(),
        },
    )
    .await
    .expect("seed firm profile");
    (user, firm)
}
