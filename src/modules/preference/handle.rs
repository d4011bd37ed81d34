use actix_web::{HttpRequest, get, put, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        activity::repository_pg::ActivityRepositoryPg,
        preference::{
            model::{PreferenceResponse, UpdatePreferenceModel},
            repository_pg::PreferenceRepositoryPg,
            service::PreferenceService,
        },
    },
    utils::ValidatedJson,
};

pub type PreferenceSvc = PreferenceService<PreferenceRepositoryPg, ActivityRepositoryPg>;

#[get("")]
pub async fn get_preferences(
    preference_service: web::Data<PreferenceSvc>,
    req: HttpRequest,
) -> Result<success::Success<PreferenceResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let preferences = preference_service.get(user_id).await?;
    Ok(success::Success::ok(Some(preferences)).message("Preferences retrieved successfully"))
}

#[put("")]
pub async fn update_preferences(
    preference_service: web::Data<PreferenceSvc>,
    body: ValidatedJson<UpdatePreferenceModel>,
    req: HttpRequest,
) -> Result<success::Success<PreferenceResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let preferences = preference_service.update(user_id, body.0.preferred_categories).await?;
    Ok(success::Success::ok(Some(preferences)).message("Preferences updated successfully"))
}
