//! Account and session commands.

use secrecy::SecretString;
use tracing::info;

use dancemode_client::DancemodeClient;
use dancemode_client::store::Readable;
use dancemode_core::DanceExperience;
use dancemode_core::models::{LoginRequest, RegisterRequest, UserProfile, UserProfileUpdate};

/// Details for a new account.
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub experience: DanceExperience,
}

/// Create an account and store the session.
///
/// # Errors
///
/// Returns an error if the service rejects the account.
pub async fn register(
    client: &DancemodeClient,
    account: NewAccount,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = RegisterRequest {
        email: account.email,
        password: SecretString::from(account.password),
        first_name: account.first_name,
        last_name: account.last_name,
        phone: account.phone,
        dance_experience: account.experience,
    };
    client.auth().register(client.api(), &request).await?;
    log_user(client);
    Ok(())
}

/// Sign in and store the session.
///
/// # Errors
///
/// Returns an error if the credentials are rejected.
pub async fn login(
    client: &DancemodeClient,
    email: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = LoginRequest {
        email,
        password: SecretString::from(password),
    };
    client.auth().sign_in(client.api(), &request).await?;
    log_user(client);
    Ok(())
}

pub async fn logout(client: &DancemodeClient) {
    client.auth().sign_out(client.api()).await;
    info!("Signed out");
}

/// Show the stored session without contacting the service.
pub fn whoami(client: &DancemodeClient) {
    if client.state().is_authenticated() {
        log_user(client);
    } else {
        info!("Not signed in");
    }
}

/// Fetch the profile and refresh the stored session with it.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn show_profile(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let profile = client.auth().refresh_profile(client.api()).await?;
    log_profile(&profile);
    Ok(())
}

/// # Errors
///
/// Returns an error if nothing would change or the request fails.
pub async fn update_profile(
    client: &DancemodeClient,
    update: &UserProfileUpdate,
) -> Result<(), Box<dyn std::error::Error>> {
    if update == &UserProfileUpdate::default() {
        return Err("No profile fields given".into());
    }
    let profile = client.auth().save_profile(client.api(), update).await?;
    info!("Profile updated");
    log_profile(&profile);
    Ok(())
}

fn log_user(client: &DancemodeClient) {
    let name = client.state().display_name().get().unwrap_or_default();
    let creator = client.state().is_creator().get();
    info!(creator, "Signed in as {name}");
}

fn log_profile(profile: &UserProfile) {
    info!("{} <{}>", profile.display_name(), profile.email);
    info!("  Role: {:?}", profile.role);
    if let Some(experience) = profile.dance_experience {
        info!("  Experience: {experience}");
    }
    if let Some(phone) = &profile.phone {
        info!("  Phone: {phone}");
    }
}
