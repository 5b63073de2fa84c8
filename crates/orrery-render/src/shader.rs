//! Shader module loading and binding resolution.
//!
//! Every program declares the resource names it needs. Loading a program
//! parses its WGSL with naga and builds a [`UniformTable`] from the module's
//! bound globals; a declared name the source does not bind is a
//! [`ShaderError::MissingBinding`].

use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Error types for shader loading operations.
#[derive(Debug, Error, PartialEq)]
pub enum ShaderError {
    #[error("program '{program}' does not bind required resource '{name}'")]
    MissingBinding { program: String, name: String },

    #[error("program '{program}' binds '{name}' twice")]
    DuplicateBinding { program: String, name: String },

    #[error("program '{program}' failed to parse:\n{message}")]
    Parse { program: String, message: String },

    #[error("shader '{name}' not found in library")]
    NotLoaded { name: String },

    #[error("program '{program}' leaves bind group {group} empty")]
    GroupGap { program: String, group: u32 },

    #[error(
        "program '{program}' binds '{name}' at group {} binding {}, expected group {} binding {}",
        found.group, found.binding, expected.group, expected.binding
    )]
    Misplaced {
        program: String,
        name: String,
        expected: BindingSlot,
        found: BindingSlot,
    },
}

/// Location of one resource in the bind group model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
}

/// The names a program must bind, checked when it is loaded.
#[derive(Debug, Clone, Copy)]
pub struct ProgramContract {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

/// Resolved name to slot mapping for one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformTable {
    slots: HashMap<String, BindingSlot>,
}

impl UniformTable {
    /// Parse WGSL source and collect its resource bindings.
    pub fn scan(program: &str, source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Parse {
            program: program.to_string(),
            message: err.emit_to_string(source),
        })?;

        // Redefinitions are parse errors, so names are unique here.
        let slots = module
            .global_variables
            .iter()
            .filter_map(|(_, global)| {
                let name = global.name.clone()?;
                let binding = global.binding.as_ref()?;
                Some((
                    name,
                    BindingSlot {
                        group: binding.group,
                        binding: binding.binding,
                    },
                ))
            })
            .collect();

        Ok(Self { slots })
    }

    /// Scan `source` and check it binds everything `contract` requires.
    pub fn resolve(contract: &ProgramContract, source: &str) -> Result<Self, ShaderError> {
        let table = Self::scan(contract.name, source)?;
        for name in contract.required {
            if !table.slots.contains_key(*name) {
                return Err(ShaderError::MissingBinding {
                    program: contract.name.to_string(),
                    name: (*name).to_string(),
                });
            }
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<BindingSlot> {
        self.slots.get(name).copied()
    }

    /// Bind group index of `name`.
    pub fn group_of(&self, program: &str, name: &str) -> Result<u32, ShaderError> {
        self.get(name)
            .map(|slot| slot.group)
            .ok_or_else(|| ShaderError::MissingBinding {
                program: program.to_string(),
                name: name.to_string(),
            })
    }

    /// Check that `name` sits at `expected`.
    pub fn require_slot(
        &self,
        program: &str,
        name: &str,
        expected: BindingSlot,
    ) -> Result<(), ShaderError> {
        let found = self.get(name).ok_or_else(|| ShaderError::MissingBinding {
            program: program.to_string(),
            name: name.to_string(),
        })?;
        if found != expected {
            return Err(ShaderError::Misplaced {
                program: program.to_string(),
                name: name.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Order per-group values by the group their named resource lives in.
    ///
    /// Each entry names one resource of a distinct group. The result is
    /// indexed by group, which must run 0..n without gaps, as a pipeline
    /// layout requires.
    pub fn order_by_group<T: Copy>(
        &self,
        program: &str,
        entries: &[(&str, T)],
    ) -> Result<Vec<T>, ShaderError> {
        let mut placed = Vec::with_capacity(entries.len());
        for &(name, value) in entries {
            placed.push((name, self.group_of(program, name)?, value));
        }

        let group_count = placed
            .iter()
            .map(|(_, group, _)| *group as usize + 1)
            .max()
            .unwrap_or(0);
        let mut grouped: Vec<Option<T>> = vec![None; group_count];
        for (name, group, value) in placed {
            let slot = &mut grouped[group as usize];
            if slot.is_some() {
                return Err(ShaderError::DuplicateBinding {
                    program: program.to_string(),
                    name: name.to_string(),
                });
            }
            *slot = Some(value);
        }

        grouped
            .into_iter()
            .enumerate()
            .map(|(group, value)| {
                value.ok_or_else(|| ShaderError::GroupGap {
                    program: program.to_string(),
                    group: group as u32,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A compiled program and its resolved bindings.
pub struct Program {
    pub module: Arc<wgpu::ShaderModule>,
    pub bindings: UniformTable,
}

/// Registry of compiled shader modules.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Load a shader from a WGSL source string.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        debug!("Loading shader '{}' from source", name);

        let module = Arc::new(device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        }));

        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }
        module
    }

    /// Resolve `contract` against `source`, then compile it.
    pub fn load_program(
        &mut self,
        device: &wgpu::Device,
        contract: &ProgramContract,
        source: &str,
    ) -> Result<Program, ShaderError> {
        let bindings = UniformTable::resolve(contract, source)?;
        let module = self.load_from_source(device, contract.name, source);
        Ok(Program { module, bindings })
    }

    /// Get a previously loaded shader by name.
    pub fn get(&self, name: &str) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ShaderError::NotLoaded {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}
