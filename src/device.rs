//! # Device Modules
//!
//! The model only needs two things from a device backend: a way to open it
//! and the list of registers it exposes. Transport (reading and writing
//! register values) lives outside this crate.
//!
//! Backend `open()` calls are not thread-safe in general. All opens go
//! through one explicit [`DeviceOpenLock`] shared by the whole process.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::lifecycle::{self, AccessorSpec};
use crate::model::{NetworkNode, UpdateMode, VariableDirection};
use crate::proxy::{AnyProxy, DeviceModuleProxy, ProcessVariableProxy};
use crate::{Error, Result};

// ============================================================================
// DeviceOpenLock
// ============================================================================

/// Process-wide lock serialising backend `open()` calls.
///
/// Create one per process and hand clones to every device. Hold the guard
/// from [`acquire`](Self::acquire) for the duration of exactly one open.
#[derive(Clone, Default)]
pub struct DeviceOpenLock {
    inner: Arc<Mutex<()>>,
}

impl DeviceOpenLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other open is in progress.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock()
    }

    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.inner.try_lock()
    }
}

impl std::fmt::Debug for DeviceOpenLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceOpenLock").field("locked", &self.inner.is_locked()).finish()
    }
}

// ============================================================================
// Registers
// ============================================================================

/// A register as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Register path, e.g. `MODULE/REG`. Relative to the device's directory.
    pub path: String,
    pub readable: bool,
    pub writeable: bool,
    /// The backend pushes new values instead of being polled.
    pub push: bool,
}

impl RegisterDescriptor {
    pub fn new(path: impl Into<String>, readable: bool, writeable: bool) -> Self {
        Self { path: path.into(), readable, writeable, push: false }
    }

    pub fn push(mut self) -> Self {
        self.push = true;
        self
    }

    /// Data flow seen from the device: writeable registers consume,
    /// read-only registers feed.
    pub fn direction(&self) -> VariableDirection {
        if self.writeable { VariableDirection::consuming() } else { VariableDirection::feeding() }
    }

    pub fn mode(&self) -> UpdateMode {
        if self.push && !self.writeable { UpdateMode::Push } else { UpdateMode::Poll }
    }
}

/// Minimal view of a device backend.
pub trait DeviceBackend: Send {
    /// Alias or connection string identifying the device.
    fn alias_or_cdd(&self) -> &str;

    /// Open the device. Implementations must hold `lock` while opening.
    fn open(&mut self, lock: &DeviceOpenLock) -> Result<()>;

    fn is_opened(&self) -> bool;

    /// All registers of the device.
    fn list_registers(&self) -> Result<Vec<RegisterDescriptor>>;
}

/// Publish every register of `backend` as a process variable accessed by
/// `device`. Registers land in the directory of the device's owner.
/// Either all registers are attached or none.
pub fn attach_registers(
    device: &DeviceModuleProxy,
    backend: &dyn DeviceBackend,
) -> Result<Vec<(ProcessVariableProxy, NetworkNode)>> {
    let registers = backend.list_registers().map_err(|e| {
        Error::Transport(format!(
            "Registers of device '{}' could not be listed: {e}",
            backend.alias_or_cdd()
        ))
    })?;
    let owner: AnyProxy = device.clone().into();
    let mut attached = Vec::with_capacity(registers.len());
    for register in &registers {
        let spec = AccessorSpec::new(register.direction(), register.mode()).device();
        match lifecycle::attach_variable(&owner, &register.path, spec) {
            Ok(pair) => attached.push(pair),
            Err(e) => {
                for (pv, node) in attached.iter().rev() {
                    if let Err(undo) = lifecycle::detach_variable(pv, node) {
                        tracing::warn!(device = backend.alias_or_cdd(), error = %undo, "could not detach register");
                    }
                }
                return Err(e);
            }
        }
    }
    tracing::debug!(device = backend.alias_or_cdd(), registers = attached.len(), "attached device registers");
    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NativeRef, NodeType, VertexKind};
    use crate::proxy::{ModelProxy, RootProxy};
    use pretty_assertions::assert_eq;

    struct MockBackend {
        opened: bool,
        registers: Option<Vec<RegisterDescriptor>>,
    }

    impl DeviceBackend for MockBackend {
        fn alias_or_cdd(&self) -> &str {
            "Dummy0"
        }

        fn open(&mut self, lock: &DeviceOpenLock) -> Result<()> {
            let _guard = lock.acquire();
            self.opened = true;
            Ok(())
        }

        fn is_opened(&self) -> bool {
            self.opened
        }

        fn list_registers(&self) -> Result<Vec<RegisterDescriptor>> {
            self.registers.clone().ok_or_else(|| Error::Transport("no map file".into()))
        }
    }

    #[test]
    fn test_open_lock_is_shared() {
        let lock = DeviceOpenLock::new();
        let other = lock.clone();
        let guard = lock.acquire();
        assert!(other.try_acquire().is_none());
        drop(guard);
        assert!(other.try_acquire().is_some());

        let mut backend = MockBackend { opened: false, registers: None };
        backend.open(&other).unwrap();
        assert!(backend.is_opened());
    }

    #[test]
    fn test_register_direction() {
        let ro = RegisterDescriptor::new("A/ro", true, false).push();
        assert_eq!(ro.direction(), VariableDirection::feeding());
        assert_eq!(ro.mode(), UpdateMode::Push);
        let rw = RegisterDescriptor::new("A/rw", true, true).push();
        assert_eq!(rw.direction(), VariableDirection::consuming());
        assert_eq!(rw.mode(), UpdateMode::Poll);
    }

    #[test]
    fn test_attach_registers() {
        let root = RootProxy::new(NativeRef(0));
        let group = root.add_module_group("Devices", NativeRef(1)).unwrap();
        let device = group.add_device_module("Dummy0", None, NativeRef(2)).unwrap();
        let backend = MockBackend {
            opened: true,
            registers: Some(vec![
                RegisterDescriptor::new("ADC/value", true, false),
                RegisterDescriptor::new("DAC/setpoint", false, true),
            ]),
        };
        let attached = attach_registers(&device, &backend).unwrap();
        let paths: Vec<String> = attached.iter().map(|(pv, _)| pv.qualified_path().unwrap()).collect();
        assert_eq!(paths, vec!["/Devices/ADC/value", "/Devices/DAC/setpoint"]);
        assert!(attached.iter().all(|(_, n)| n.node_type == NodeType::Device));
    }

    #[test]
    fn test_attach_registers_transport_error() {
        let root = RootProxy::new(NativeRef(0));
        let device = root.add_device_module("Dummy0", None, NativeRef(1)).unwrap();
        let backend = MockBackend { opened: false, registers: None };
        assert!(matches!(attach_registers(&device, &backend), Err(Error::Transport(_))));
    }

    #[test]
    fn test_attach_registers_all_or_nothing() {
        let root = RootProxy::new(NativeRef(0));
        let device = root.add_device_module("Dummy0", None, NativeRef(1)).unwrap();
        let backend = MockBackend {
            opened: true,
            registers: Some(vec![
                RegisterDescriptor::new("ADC/value", true, false),
                RegisterDescriptor::new("../outside", true, false),
            ]),
        };
        assert!(matches!(attach_registers(&device, &backend), Err(Error::Structural(_))));

        let graph = device.base().model().unwrap().read();
        let pvs = graph.vertices().filter(|(_, p)| p.kind() == VertexKind::ProcessVariable).count();
        assert_eq!(pvs, 0);
    }
}
