//! Study group handlers: thin JSON adapters over [`PumaPalServer`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pumapal_api::{
    CreateGroupRequest, GroupDeleted, JoinRequest, LeaveRequest, LeaveResponse, SearchRequest,
    StudyGroupDto, UpdateGroupRequest,
};
use pumapal_storage::{GroupId, StudyGroup};

use crate::error::{ApiError, JsonBody};
use crate::server::{LeaveResult, PumaPalServer};

/// Malformed ids can never name a group.
fn parse_id(raw: &str) -> Result<GroupId, ApiError> {
    raw.parse().map_err(|_| ApiError::group_not_found())
}

fn to_dtos(groups: Vec<StudyGroup>) -> Vec<StudyGroupDto> {
    groups.into_iter().map(StudyGroupDto::from).collect()
}

pub async fn list_groups(
    State(server): State<PumaPalServer>,
) -> Result<Json<Vec<StudyGroupDto>>, ApiError> {
    Ok(Json(to_dtos(server.list_active().await?)))
}

pub async fn search_groups(
    State(server): State<PumaPalServer>,
    JsonBody(req): JsonBody<SearchRequest>,
) -> Result<Json<Vec<StudyGroupDto>>, ApiError> {
    Ok(Json(to_dtos(server.search(req.course.as_deref()).await?)))
}

pub async fn create_group(
    State(server): State<PumaPalServer>,
    JsonBody(req): JsonBody<CreateGroupRequest>,
) -> Result<(StatusCode, Json<StudyGroupDto>), ApiError> {
    let group = server.create(req).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn get_group(
    State(server): State<PumaPalServer>,
    Path(id): Path<String>,
) -> Result<Json<StudyGroupDto>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(server.get(&id).await?.into()))
}

pub async fn update_group(
    State(server): State<PumaPalServer>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateGroupRequest>,
) -> Result<Json<StudyGroupDto>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(server.update(&id, req).await?.into()))
}

pub async fn delete_group(
    State(server): State<PumaPalServer>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    server.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_group(
    State(server): State<PumaPalServer>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<JoinRequest>,
) -> Result<Json<StudyGroupDto>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(server.join(&id, req).await?.into()))
}

pub async fn leave_group(
    State(server): State<PumaPalServer>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<LeaveRequest>,
) -> Result<Json<LeaveResponse>, ApiError> {
    let id = parse_id(&id)?;
    let response = match server.leave(&id, req).await? {
        LeaveResult::Remaining(group) => LeaveResponse::Group(Box::new(group.into())),
        LeaveResult::Deleted => LeaveResponse::Deleted(GroupDeleted::last_member_left()),
    };
    Ok(Json(response))
}
