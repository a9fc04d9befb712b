use log::info;
use uuid::Uuid;

use super::{HttpMethod, MockEndpoint, MockInput, MockPatch};
use crate::error::{DemoError, DemoResult};

/// In-memory mock endpoint configurations, kept in creation order.
#[derive(Debug, Default)]
pub struct MockStore {
    mocks: Vec<MockEndpoint>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[MockEndpoint] {
        &self.mocks
    }

    pub fn get(&self, id: Uuid) -> DemoResult<&MockEndpoint> {
        self.mocks
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| DemoError::NotFound(format!("mock {id}")))
    }

    fn get_mut(&mut self, id: Uuid) -> DemoResult<&mut MockEndpoint> {
        self.mocks
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DemoError::NotFound(format!("mock {id}")))
    }

    /// Only one mock may own a (method, path) pair.
    fn ensure_route_free(&self, method: HttpMethod, path: &str, except: Option<Uuid>) -> DemoResult<()> {
        let taken = self
            .mocks
            .iter()
            .any(|m| Some(m.id) != except && m.method == method && m.path == path);
        if taken {
            return Err(DemoError::Conflict(format!(
                "a mock for {method:?} {path} already exists"
            )));
        }
        Ok(())
    }

    pub fn create(&mut self, input: MockInput) -> DemoResult<MockEndpoint> {
        self.ensure_route_free(input.method, &input.path, None)?;
        let mock = MockEndpoint::from_input(input)?;
        info!("MOCK - created {} {:?} {}", mock.id, mock.method, mock.path);
        self.mocks.push(mock.clone());
        Ok(mock)
    }

    pub fn replace(&mut self, id: Uuid, input: MockInput) -> DemoResult<MockEndpoint> {
        self.ensure_route_free(input.method, &input.path, Some(id))?;
        let mock = self.get_mut(id)?;
        mock.replace(input)?;
        info!("MOCK - replaced {id}");
        Ok(mock.clone())
    }

    pub fn patch(&mut self, id: Uuid, patch: MockPatch) -> DemoResult<MockEndpoint> {
        let current = self.get(id)?;
        let method = patch.method.unwrap_or(current.method);
        let path = patch.path.clone().unwrap_or_else(|| current.path.clone());
        self.ensure_route_free(method, &path, Some(id))?;

        let mock = self.get_mut(id)?;
        mock.apply(patch)?;
        info!("MOCK - patched {id}");
        Ok(mock.clone())
    }

    pub fn set_status(&mut self, id: Uuid, enabled: bool) -> DemoResult<MockEndpoint> {
        self.patch(
            id,
            MockPatch {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
    }

    pub fn delete(&mut self, id: Uuid) -> DemoResult<MockEndpoint> {
        let idx = self
            .mocks
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| DemoError::NotFound(format!("mock {id}")))?;
        info!("MOCK - deleted {id}");
        Ok(self.mocks.remove(idx))
    }
}
