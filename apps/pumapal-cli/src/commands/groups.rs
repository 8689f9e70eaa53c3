use pumapal_api::{CreateGroupRequest, StudyGroupDto, UpdateGroupRequest};
use pumapal_config::ProfileConfig;

use crate::cli::{CreateArgs, EditArgs};
use crate::client::{HttpClient, StudyGroupClient};
use crate::commands::profile::{email_or_profile, name_or_profile};
use crate::filter::GroupFilter;
use crate::view::{GroupCard, ResultsView};

#[cfg(test)]
use crate::client::MockStudyGroupClient;

pub const NOT_OWNER_DELETE: &str = "Only the group owner can delete this group";

/// Upcoming groups narrowed by `filter`.
pub async fn list_inner<C>(
    client: &C,
    filter: &GroupFilter,
) -> Result<Vec<StudyGroupDto>, Box<dyn std::error::Error>>
where
    C: StudyGroupClient,
{
    Ok(filter.apply(client.list_groups().await?))
}

pub async fn search_inner<C>(
    client: &C,
    course: &str,
    filter: &GroupFilter,
) -> Result<Vec<StudyGroupDto>, Box<dyn std::error::Error>>
where
    C: StudyGroupClient,
{
    Ok(filter.apply(client.search_groups(course).await?))
}

pub fn create_request(
    args: CreateArgs,
    profile: &ProfileConfig,
) -> Result<CreateGroupRequest, Box<dyn std::error::Error>> {
    Ok(CreateGroupRequest {
        name: Some(name_or_profile(args.identity.name.as_deref(), profile)?),
        email: Some(email_or_profile(args.identity.email.as_deref(), profile)?),
        course: Some(args.course),
        campus: Some(args.campus),
        meeting_time: Some(args.time),
        date: Some(args.date),
        location: args.location,
        notes: args.notes,
        group_title: args.title,
        show_owner_email: Some(!args.hide_email),
    })
}

pub fn update_request(
    args: &EditArgs,
    profile: &ProfileConfig,
) -> Result<UpdateGroupRequest, Box<dyn std::error::Error>> {
    let request = UpdateGroupRequest {
        email: Some(email_or_profile(args.email.as_deref(), profile)?),
        group_title: args.title.clone(),
        campus: args.campus.clone(),
        location: args.location.clone(),
        date: args.date.clone(),
        meeting_time: args.time.clone(),
        notes: args.notes.clone(),
        show_owner_email: args.show_email,
    };
    let unchanged = UpdateGroupRequest {
        email: request.email.clone(),
        ..Default::default()
    };
    if request == unchanged {
        return Err("Nothing to change; pass at least one field to edit".into());
    }
    Ok(request)
}

/// Delete after confirming the caller owns the group.
pub async fn delete_inner<C>(
    client: &C,
    id: &str,
    email: &str,
) -> Result<StudyGroupDto, Box<dyn std::error::Error>>
where
    C: StudyGroupClient,
{
    let group = client.get_group(id).await?;
    if !group.is_owner(email) {
        return Err(NOT_OWNER_DELETE.into());
    }
    client.delete_group(id).await?;
    Ok(group)
}

pub async fn cmd_list(
    server: &str,
    profile: &ProfileConfig,
    filter: GroupFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let groups = list_inner(&client, &filter).await?;
    print!("{}", ResultsView::new(&groups, profile.email.as_deref()).render());
    Ok(())
}

pub async fn cmd_search(
    server: &str,
    profile: &ProfileConfig,
    course: &str,
    filter: GroupFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let groups = search_inner(&client, course, &filter).await?;
    print!("{}", ResultsView::new(&groups, profile.email.as_deref()).render());
    Ok(())
}

pub async fn cmd_show(
    server: &str,
    profile: &ProfileConfig,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let group = client.get_group(id).await?;
    print!("{}", GroupCard::new(&group, 1, profile.email.as_deref()).render());
    Ok(())
}

pub async fn cmd_create(
    server: &str,
    profile: &ProfileConfig,
    args: CreateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let request = create_request(args, profile)?;
    let viewer = request.email.clone();
    let group = client.create_group(request).await?;

    println!("✓ Study group created!\n");
    print!("{}", GroupCard::new(&group, 1, viewer.as_deref()).render());
    Ok(())
}

pub async fn cmd_edit(
    server: &str,
    profile: &ProfileConfig,
    args: EditArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let request = update_request(&args, profile)?;
    let viewer = request.email.clone();
    let group = client.update_group(&args.id, request).await?;

    println!("✓ Group updated\n");
    print!("{}", GroupCard::new(&group, 1, viewer.as_deref()).render());
    Ok(())
}

pub async fn cmd_delete(
    server: &str,
    profile: &ProfileConfig,
    id: &str,
    email: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpClient::new(server);
    let email = email_or_profile(email, profile)?;
    let group = delete_inner(&client, id, &email).await?;
    println!("✓ Deleted {} ({})", group.course, group.id);
    Ok(())
}
