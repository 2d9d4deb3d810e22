//! Arena of file parts addressed by [`PartHandle`].
use std::collections::HashMap;

use crate::error::{ControlError, ErrorSeverity};
use crate::part::{FilePart, Ident, PartHandle};

/// Errors raised while populating a [`PartRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Another part already carries this identifier.
    #[error("identifier {ident} is already registered as {existing}")]
    DuplicateIdent { ident: Ident, existing: PartHandle },

    /// The arena ran out of handles.
    #[error("part registry is full ({len} parts)")]
    CapacityExceeded { len: usize },
}

impl ControlError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateIdent { .. } => ErrorSeverity::Validation,
            Self::CapacityExceeded { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateIdent { .. } => "REGISTRY_DUPLICATE_IDENT",
            Self::CapacityExceeded { .. } => "REGISTRY_CAPACITY_EXCEEDED",
        }
    }
}

/// Owns every file part of a control model.
///
/// Parts are appended during the load phase and never removed, so handles stay
/// valid for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct PartRegistry {
    parts: Vec<Box<dyn FilePart>>,
    index: HashMap<Ident, PartHandle>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a part into the arena.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateIdent` if a part with the same
    /// identifier is already registered.
    pub fn insert<P: FilePart + 'static>(&mut self, part: P) -> Result<PartHandle, RegistryError> {
        self.insert_boxed(Box::new(part))
    }

    pub fn insert_boxed(&mut self, part: Box<dyn FilePart>) -> Result<PartHandle, RegistryError> {
        let ident = part.id();
        if let Some(&existing) = self.index.get(&ident) {
            return Err(RegistryError::DuplicateIdent { ident, existing });
        }
        let slot = u32::try_from(self.parts.len()).map_err(|_| RegistryError::CapacityExceeded {
            len: self.parts.len(),
        })?;
        let handle = PartHandle(slot);
        self.parts.push(part);
        self.index.insert(ident, handle);
        Ok(handle)
    }

    pub fn get(&self, handle: PartHandle) -> Option<&dyn FilePart> {
        self.parts.get(handle.index()).map(|part| part.as_ref())
    }

    pub fn handle_of(&self, ident: Ident) -> Option<PartHandle> {
        self.index.get(&ident).copied()
    }

    /// Looks a part up by identifier.
    pub fn resolve(&self, ident: Ident) -> Option<&dyn FilePart> {
        self.handle_of(ident).and_then(|handle| self.get(handle))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartHandle, &dyn FilePart)> + '_ {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| (PartHandle(i as u32), part.as_ref()))
    }
}
