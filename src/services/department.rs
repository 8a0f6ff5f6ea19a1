//! Department endpoints.

use crate::error::KayakoError;
use crate::models::Department;
use crate::service::{BaseService, ServiceConfig};
use crate::transport::Params;
use crate::xml::Parsed;

use super::expect_single;

/// Endpoint for departments.
pub const DEPARTMENT_PATH: &str = "/Base/Department";

/// Element name of one department in responses.
pub const DEPARTMENT_TAG: &str = "department";

/// Read access to helpdesk departments.
#[derive(Debug, Clone)]
pub struct DepartmentService {
    base: BaseService,
}

impl DepartmentService {
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

    /// Lists all departments.
    pub async fn list(&self) -> Result<Parsed<Department>, KayakoError> {
        let body = self.base.get(DEPARTMENT_PATH, Params::new()).await?;
        self.base.parse_models(&body, DEPARTMENT_TAG)
    }

    /// Fetches one department.
    pub async fn get(&self, id: u64) -> Result<Department, KayakoError> {
        let path = format!("{}/{}", DEPARTMENT_PATH, id);
        let body = self.base.get(&path, Params::new()).await?;
        expect_single(self.base.parse_models(&body, DEPARTMENT_TAG)?, DEPARTMENT_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{config, CannedTransport};
    use reqwest::Method;

    const TWO: &str = "<departments>\
        <department><id>1</id><title>General</title></department>\
        <department><id>2</id><title>Billing</title></department>\
        </departments>";

    #[tokio::test]
    async fn test_list_departments() {
        let transport = CannedTransport::new(200, TWO);
        let service = DepartmentService::new(config(transport.clone()));

        let departments = service.list().await.unwrap().into_vec();
        let titles: Vec<&str> = departments.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["General", "Billing"]);

        let (method, params) = transport.last();
        assert_eq!(method, Method::GET);
        assert_eq!(params["e"], "/Base/Department");
    }

    #[tokio::test]
    async fn test_get_department() {
        let transport = CannedTransport::new(
            200,
            "<departments><department><id>2</id><title>Billing</title></department></departments>",
        );
        let service = DepartmentService::new(config(transport.clone()));

        let department = service.get(2).await.unwrap();
        assert_eq!(department.id, 2);
        assert_eq!(transport.last().1["e"], "/Base/Department/2");
    }

    #[tokio::test]
    async fn test_get_department_with_two_matches_fails() {
        let service = DepartmentService::new(config(CannedTransport::new(200, TWO)));
        assert!(matches!(
            service.get(1).await,
            Err(KayakoError::Parse { .. })
        ));
    }
}
