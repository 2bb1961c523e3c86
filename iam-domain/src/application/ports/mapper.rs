use crate::domain::errors::DomainResult;

/// Translates a domain model into the payload a store consumes.
///
/// Mappers are pure: no I/O, and the model is only borrowed. A model that
/// lacks data the payload needs yields a `Validation` error.
pub trait OperationMapper<M>: Send + Sync {
    type Payload;

    fn map(&self, model: &M) -> DomainResult<Self::Payload>;
}

/// Mapper for stores that persist the model as-is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMapper;

impl<M: Clone + Send + Sync> OperationMapper<M> for IdentityMapper {
    type Payload = M;

    fn map(&self, model: &M) -> DomainResult<M> {
        Ok(model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntityKey, Grant};

    #[test]
    fn identity_mapper_returns_equal_copy() {
        let grant = Grant::new(EntityKey::new("cgr_1").unwrap(), "client", "https://api")
            .with_scopes(["read:things"]);
        let mapped = IdentityMapper.map(&grant).unwrap();
        assert_eq!(mapped, grant);
    }
}
