use std::path::Path;

use pumapal_config::{ConfigError, ProfileConfig};

/// An explicit flag wins over the profile.
pub fn email_or_profile(flag: Option<&str>, profile: &ProfileConfig) -> Result<String, ConfigError> {
    match flag.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => Ok(email.to_string()),
        None => profile.require_email().map(str::to_string),
    }
}

pub fn name_or_profile(flag: Option<&str>, profile: &ProfileConfig) -> Result<String, ConfigError> {
    match flag.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => Ok(name.to_string()),
        None => profile.require_name().map(str::to_string),
    }
}

/// Merge the given fields into the profile at `path` and save it.
pub fn profile_set_inner(
    path: &Path,
    name: Option<&str>,
    email: Option<&str>,
    server: Option<&str>,
) -> Result<ProfileConfig, Box<dyn std::error::Error>> {
    if name.is_none() && email.is_none() && server.is_none() {
        return Err("Nothing to update; pass --name, --email or --server".into());
    }

    let mut profile = ProfileConfig::load_or_default(path)?;
    if let Some(name) = name {
        profile.name = Some(name.trim().to_string());
    }
    if let Some(email) = email {
        profile.email = Some(email.trim().to_lowercase());
    }
    if let Some(server) = server {
        profile.server = Some(server.trim().to_string());
    }
    profile.save_to(path)?;
    Ok(profile)
}

pub fn print_profile(profile: &ProfileConfig) {
    println!("Name:   {}", profile.name.as_deref().unwrap_or("(not set)"));
    println!("Email:  {}", profile.email.as_deref().unwrap_or("(not set)"));
    println!("Server: {}", profile.server_url());
}

pub fn cmd_profile_set(
    path: &Path,
    name: Option<&str>,
    email: Option<&str>,
    server: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = profile_set_inner(path, name, email, server)?;
    println!("✓ Profile saved to {}\n", path.display());
    print_profile(&profile);
    Ok(())
}

pub fn cmd_profile_show(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let profile = ProfileConfig::load_from(path)?;
    print_profile(&profile);
    Ok(())
}
