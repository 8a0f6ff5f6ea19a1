//! User endpoints.

use crate::error::KayakoError;
use crate::models::{NewUser, User};
use crate::service::{BaseService, ServiceConfig};
use crate::transport::Params;
use crate::xml::Parsed;

use super::expect_single;

/// Endpoint for users.
pub const USER_PATH: &str = "/Base/User";

/// Element name of one user in responses.
pub const USER_TAG: &str = "user";

/// Access to helpdesk users.
#[derive(Debug, Clone)]
pub struct UserService {
    base: BaseService,
}

impl UserService {
    /// Creates the service.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            base: BaseService::new(config),
        }
    }

    /// Returns the underlying request helper.
    pub fn base(&self) -> &BaseService {
        &self.base
    }

    /// Lists users.
    pub async fn list(&self) -> Result<Parsed<User>, KayakoError> {
        let path = format!("{}/Filter", USER_PATH);
        let body = self.base.get(&path, Params::new()).await?;
        self.base.parse_models(&body, USER_TAG)
    }

    /// Fetches one user.
    pub async fn get(&self, id: u64) -> Result<User, KayakoError> {
        let path = format!("{}/{}", USER_PATH, id);
        let body = self.base.get(&path, Params::new()).await?;
        expect_single(self.base.parse_models(&body, USER_TAG)?, USER_TAG)
    }

    /// Creates a user and returns it as stored.
    pub async fn create(&self, user: &NewUser) -> Result<User, KayakoError> {
        user.validate()?;
        let body = self.base.post(USER_PATH, user.to_params()).await?;
        expect_single(self.base.parse_models(&body, USER_TAG)?, USER_TAG)
    }

    /// Deletes a user.
    pub async fn delete(&self, id: u64) -> Result<(), KayakoError> {
        let path = format!("{}/{}", USER_PATH, id);
        self.base.delete(&path, Params::new()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{config, CannedTransport};
    use reqwest::Method;

    const ONE: &str = "<users><user><id>5</id><fullname>Ann</fullname>\
        <email>ann@example.com</email></user></users>";

    #[tokio::test]
    async fn test_list_single_user_is_scalar() {
        let service = UserService::new(config(CannedTransport::new(200, ONE)));
        match service.list().await.unwrap() {
            Parsed::Single(user) => assert_eq!(user.id, 5),
            Parsed::Many(users) => panic!("expected one user, got {}", users.len()),
        }
    }

    #[tokio::test]
    async fn test_create_posts_fields() {
        let transport = CannedTransport::new(200, ONE);
        let service = UserService::new(config(transport.clone()));

        let user = service
            .create(&NewUser::new("Ann", "ann@example.com", "pw", 2))
            .await
            .unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Ann"));

        let (method, params) = transport.last();
        assert_eq!(method, Method::POST);
        assert_eq!(params["e"], "/Base/User");
        assert_eq!(params["fullname"], "Ann");
        assert_eq!(params["usergroupid"], "2");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_user_without_sending() {
        let transport = CannedTransport::new(200, ONE);
        let service = UserService::new(config(transport.clone()));

        let err = service
            .create(&NewUser::new("Ann", "nope", "pw", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, KayakoError::Validation(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let transport = CannedTransport::new(200, "");
        let service = UserService::new(config(transport.clone()));

        service.delete(9).await.unwrap();
        let (method, params) = transport.last();
        assert_eq!(method, Method::DELETE);
        assert_eq!(params["e"], "/Base/User/9");
    }

    #[tokio::test]
    async fn test_missing_user_is_client_error() {
        let service = UserService::new(config(CannedTransport::new(404, "User not found")));
        let err = service.get(1).await.unwrap_err();
        assert!(err.is_client_error());
    }
}
