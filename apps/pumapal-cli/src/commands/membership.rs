use pumapal_api::{JoinRequest, LeaveRequest, LeaveResponse, StudyGroupDto};
use pumapal_config::ProfileConfig;

use crate::cli::IdentityArgs;
use crate::client::{HttpClient, StudyGroupClient};
use crate::commands::profile::{email_or_profile, name_or_profile};
use crate::view::GroupCard;

#[cfg(test)]
use crate::client::MockStudyGroupClient;

pub async fn join_inner<C>(
    client: &C,
    id: &str,
    name: &str,
    email: &str,
) -> Result<StudyGroupDto, Box<dyn std::error::Error>>
where
    C: StudyGroupClient,
{
    let request = JoinRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
    };
    Ok(client.join_group(id, request).await?)
}

pub async fn leave_inner<C>(
    client: &C,
    id: &str,
    email: &str,
) -> Result<LeaveResponse, Box<dyn std::error::Error>>
where
    C: StudyGroupClient,
{
    let request = LeaveRequest {
        email: Some(email.to_string()),
    };
    Ok(client.leave_group(id, request).await?)
}

pub fn print_leave(response: &LeaveResponse) {
    match response {
        LeaveResponse::Deleted(deleted) => println!("✓ {}", deleted.message),
        LeaveResponse::Group(group) => {
            println!("✓ You have left the group");
            println!(
                "  {} pal(s) remain, owner: {}",
                group.attendees.len(),
                group.owner_email
            );
        }
    }
}

pub async fn cmd_join(
    server: &str,
    profile: &ProfileConfig,
    id: &str,
    identity: IdentityArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let name = name_or_profile(identity.name.as_deref(), profile)?;
    let email = email_or_profile(identity.email.as_deref(), profile)?;

    let group = join_inner(&client, id, &name, &email).await?;
    println!("✓ Successfully joined!\n");
    print!("{}", GroupCard::new(&group, 1, Some(&email)).render());
    Ok(())
}

pub async fn cmd_leave(
    server: &str,
    profile: &ProfileConfig,
    id: &str,
    email: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let email = email_or_profile(email, profile)?;

    let response = leave_inner(&client, id, &email).await?;
    print_leave(&response);
    Ok(())
}
