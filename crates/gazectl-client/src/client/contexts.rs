// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Server-side context snapshots mirrored by the client's id set.

use super::GazeClient;
use crate::contexts::ContextId;
use crate::error::{GazeClientError, Result};
use crate::rpc::{Command, Reply};
use gazectl_structures::Bottle;
use tracing::{debug, warn};

impl GazeClient {
    /// Snapshot the controller configuration on the server and track the issued id.
    pub fn store_context(&self) -> Result<ContextId> {
        let reply = self.call(Command::new("stor"))?;
        let raw = reply.int_at(1)?;
        let id = ContextId::from_wire(raw)
            .ok_or_else(|| reply.malformed(format!("invalid context id {}", raw)))?;
        if !self.contexts.insert(id) {
            debug!("[CONTEXT] id {} is the default or already tracked", id);
        }
        Ok(id)
    }

    /// Restore context `id`; `0` is the default context and always restorable.
    ///
    /// Ids this client never stored fail without contacting the server.
    pub fn restore_context(&self, id: ContextId) -> Result<()> {
        self.link()?;
        if !self.contexts.is_restorable(id) {
            return Err(GazeClientError::UnknownContext(id));
        }
        self.call(Command::new("rest").arg(id.to_wire()))?;
        Ok(())
    }

    /// Delete a tracked context on the server, then forget it.
    pub fn delete_context(&self, id: ContextId) -> Result<()> {
        self.link()?;
        if id.is_default() {
            return Err(GazeClientError::InvalidArgument(
                "the default context cannot be deleted".to_string(),
            ));
        }
        if !self.contexts.contains(id) {
            return Err(GazeClientError::UnknownContext(id));
        }

        let mut ids = Bottle::new();
        ids.add_int32(id.to_wire());
        self.call(Command::new("del").list(ids))?;
        self.contexts.remove(id);
        Ok(())
    }

    /// Delete every tracked context in one request.
    ///
    /// Once the server answered, the local set is cleared whatever the reply tag; a NACK is
    /// still reported to the caller.
    pub fn delete_all_contexts(&self) -> Result<()> {
        let channels = self.link()?;
        let ids = self.contexts.ids();
        if ids.is_empty() {
            return Ok(());
        }

        let mut list = Bottle::new();
        for id in &ids {
            list.add_int32(id.to_wire());
        }
        let command = Command::new("del").list(list);
        let reply = channels.rpc.send(&command)?;
        self.contexts.clear();
        debug!("[CONTEXT] dropped {} tracked contexts", ids.len());

        if let Err(e) = Reply::decode(&command, reply) {
            warn!("[CONTEXT] server did not confirm deleting {:?}: {}", ids, e);
            return Err(e);
        }
        Ok(())
    }
}
