use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use std::rc::Rc;

use crate::{api::error, modules::user::schema::UserRole, utils::Claims, ENV};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    let claims = Claims::decode(token, ENV.jwt_secret.as_ref())
        .map_err(|_| error::Error::unauthorized("Token Invalid or Expired"))?;

    // Refresh tokens only open the refresh endpoint, never the API.
    if claims.is_refresh() {
        return Err(error::Error::unauthorized("Token Invalid or Expired").into());
    }

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}

pub fn authorization<B>(
    allowed_roles: Vec<UserRole>,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    let allowed_roles = Rc::new(allowed_roles);
    move |req: ServiceRequest, next: Next<B>| {
        let roles = allowed_roles.clone();
        async move {
            let role = get_claims(req.request())?.role;

            if !roles.contains(&role) {
                return Err(error::Error::forbidden("No permission").into());
            }
            next.call(req).await
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{
        dev::Service,
        http::StatusCode,
        middleware::from_fn,
        test::{self, TestRequest},
        web, App, HttpResponse,
    };

    use super::*;

    async fn whoami(req: HttpRequest) -> Result<HttpResponse, error::Error> {
        let claims = get_claims(&req)?;
        Ok(HttpResponse::Ok().body(claims.sub.to_string()))
    }

    fn claims_for(role: UserRole) -> Claims {
        let id = uuid::Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        Claims::new(&id, &role, 60)
    }

    #[actix_web::test]
    async fn authorization_rejects_roles_outside_the_allow_list() {
        let claims = claims_for(UserRole::User);
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(from_fn(authorization(vec![UserRole::Admin])))
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(claims.clone());
                        srv.call(req)
                    })
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let res = test::try_call_service(&app, TestRequest::get().uri("/admin").to_request()).await;
        let err = res.err().expect("user role must be rejected");
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn authorization_passes_allowed_roles_through() {
        let claims = claims_for(UserRole::Admin);
        let expected = claims.sub.to_string();
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(from_fn(authorization(vec![UserRole::Admin])))
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(claims.clone());
                        srv.call(req)
                    })
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let res = test::call_service(&app, TestRequest::get().uri("/admin").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, expected.as_bytes());
    }

    #[actix_web::test]
    async fn handlers_without_claims_are_unauthorized() {
        let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;
        let res = test::call_service(&app, TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
