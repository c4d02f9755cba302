//! Deterministic in-memory backend.
//!
//! `ScriptedBackend` plays the role of the native engine without touching a
//! real process: targets, symbols, register snapshots, memory, and stop
//! states are all seeded up front, and every control operation simply
//! advances through the configured script. The test suite drives the
//! session against it, and the CLI exposes it as the `scripted` engine so
//! the interface can be exercised without a debuggee.
//!
//! Each engine entry point increments a counter in [`CallCounts`], which
//! lets tests assert not just what an operation returned but whether the
//! session reached the engine at all.

use std::collections::HashMap;
use std::path::Path;

use super::{Backend, BreakpointInfo, FrameHandle, ProcessHandle, RunState, SymbolInfo, TargetHandle, ThreadHandle};
use crate::error::BackendError;

/// How many times each engine entry point has been called.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts
{
    pub create_target: u32,
    pub create_breakpoint: u32,
    pub launch: u32,
    pub resume: u32,
    pub step_instruction: u32,
    pub read_memory: u32,
    pub read_pointer: u32,
    pub destroy_process: u32,
}

/// One seeded memory region.
#[derive(Debug, Clone)]
struct Region
{
    base: u64,
    bytes: Vec<u8>,
}

/// Scripted stand-in for a native debugging engine.
#[derive(Debug, Default)]
pub struct ScriptedBackend
{
    /// Paths the engine will accept as targets.
    known_targets: Vec<String>,
    /// Symbol table returned by `symbols`.
    symbol_table: Vec<SymbolInfo>,
    /// Location count per symbol a breakpoint can be created on.
    breakpoint_locations: HashMap<String, u32>,
    /// Symbols for which breakpoint creation fails outright.
    failing_breakpoints: Vec<String>,
    /// Run states reported after launch and after each subsequent
    /// resume/step, in order. Exhausting the script means `Exited`.
    stop_plan: Vec<RunState>,
    /// Register snapshot presented at each stop, in order. The last entry
    /// repeats if the process stops more often than snapshots were seeded.
    register_script: Vec<Vec<(String, String)>>,
    /// Seeded memory regions.
    regions: Vec<Region>,
    /// Pointer table consulted by `read_pointer`; absent addresses fail.
    pointers: HashMap<u64, u64>,
    /// Disassembly text returned for any frame.
    disassembly: String,
    /// Stop description returned for the selected thread.
    stop_reason: String,
    /// Force `launch` to fail.
    fail_launch: bool,
    /// Force `resume` to fail.
    fail_resume: bool,

    // Live state
    target: Option<String>,
    process_alive: bool,
    stop_index: usize,
    /// Per-entry-point call counters for test assertions.
    pub calls: CallCounts,
}

impl ScriptedBackend
{
    /// An empty engine: no targets, no memory, everything fails.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Preconfigured engine backing the CLI's demo mode: one target with a
    /// `main` symbol, two stops, shifting registers, and a small readable
    /// data region.
    #[must_use]
    pub fn demo() -> Self
    {
        Self::new()
            .with_target("demo")
            .with_symbol(1, "[0x100000f00-0x100000f40)", "main")
            .with_breakpoint_symbol("main", 1)
            .with_stops(vec![RunState::Stopped, RunState::Stopped, RunState::Exited])
            .with_registers(vec![
                vec![
                    ("rax".to_string(), "0x0000000000001000".to_string()),
                    ("rbx".to_string(), "0x0000000000000000".to_string()),
                    ("eax".to_string(), "0x00001000".to_string()),
                    ("ax".to_string(), "0x1000".to_string()),
                    ("al".to_string(), "0x00".to_string()),
                ],
                vec![
                    ("rax".to_string(), "0x0000000000001008".to_string()),
                    ("rbx".to_string(), "0x0000000000000000".to_string()),
                    ("eax".to_string(), "0x00001008".to_string()),
                    ("ax".to_string(), "0x1008".to_string()),
                    ("al".to_string(), "0x08".to_string()),
                ],
            ])
            .with_memory(0x1000, b"hello from the scripted engine\0\0".to_vec())
            .with_pointer(0x1000, 0x2000)
            .with_disassembly("demo`main:\n->  0x100000f00 <+0>: push rbp\n    0x100000f01 <+1>: mov rbp, rsp\n")
            .with_stop_reason("breakpoint 1.1")
    }

    /// Accept `path` as a loadable target.
    #[must_use]
    pub fn with_target(mut self, path: &str) -> Self
    {
        self.known_targets.push(path.to_string());
        self
    }

    /// Add one symbol descriptor to the symbol table.
    #[must_use]
    pub fn with_symbol(mut self, id: u64, range: &str, name: &str) -> Self
    {
        self.symbol_table.push(SymbolInfo {
            id,
            range: range.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Allow breakpoints on `symbol`, resolving to `locations` locations.
    #[must_use]
    pub fn with_breakpoint_symbol(mut self, symbol: &str, locations: u32) -> Self
    {
        self.breakpoint_locations.insert(symbol.to_string(), locations);
        self
    }

    /// Make breakpoint creation fail for `symbol`.
    #[must_use]
    pub fn with_failing_breakpoint(mut self, symbol: &str) -> Self
    {
        self.failing_breakpoints.push(symbol.to_string());
        self
    }

    /// Seed the run states reported after launch and each resume/step.
    #[must_use]
    pub fn with_stops(mut self, plan: Vec<RunState>) -> Self
    {
        self.stop_plan = plan;
        self
    }

    /// Seed the register snapshot shown at each stop.
    #[must_use]
    pub fn with_registers(mut self, script: Vec<Vec<(String, String)>>) -> Self
    {
        self.register_script = script;
        self
    }

    /// Seed a readable memory region at `base`.
    #[must_use]
    pub fn with_memory(mut self, base: u64, bytes: Vec<u8>) -> Self
    {
        self.regions.push(Region { base, bytes });
        self
    }

    /// Make `read_pointer(address)` yield `value`.
    #[must_use]
    pub fn with_pointer(mut self, address: u64, value: u64) -> Self
    {
        self.pointers.insert(address, value);
        self
    }

    /// Set the disassembly text returned for any frame.
    #[must_use]
    pub fn with_disassembly(mut self, text: &str) -> Self
    {
        self.disassembly = text.to_string();
        self
    }

    /// Set the stop description for the selected thread.
    #[must_use]
    pub fn with_stop_reason(mut self, reason: &str) -> Self
    {
        self.stop_reason = reason.to_string();
        self
    }

    /// Make `launch` fail.
    #[must_use]
    pub fn with_failing_launch(mut self) -> Self
    {
        self.fail_launch = true;
        self
    }

    /// Make `resume` fail.
    #[must_use]
    pub fn with_failing_resume(mut self) -> Self
    {
        self.fail_resume = true;
        self
    }

    /// Run state at the current position in the stop plan.
    fn current_state(&self) -> RunState
    {
        self.stop_plan.get(self.stop_index).copied().unwrap_or(RunState::Exited)
    }

    /// Advance to the next scripted stop.
    fn advance(&mut self)
    {
        self.stop_index += 1;
    }
}

impl Backend for ScriptedBackend
{
    fn create_target(&mut self, path: &str) -> Option<TargetHandle>
    {
        self.calls.create_target += 1;
        if self.known_targets.iter().any(|t| t == path) {
            self.target = Some(path.to_string());
            Some(TargetHandle(1))
        } else {
            None
        }
    }

    fn target_name(&self, _target: TargetHandle) -> String
    {
        self.target.clone().unwrap_or_default()
    }

    fn create_breakpoint_by_name(&mut self, _target: TargetHandle, symbol: &str, _module: &str) -> Option<BreakpointInfo>
    {
        self.calls.create_breakpoint += 1;
        if self.failing_breakpoints.iter().any(|s| s == symbol) {
            return None;
        }
        let location_count = self.breakpoint_locations.get(symbol).copied().unwrap_or(0);
        Some(BreakpointInfo { location_count })
    }

    fn launch(&mut self, _target: TargetHandle, _args: &[String], _env: &[String], _cwd: &Path) -> Option<ProcessHandle>
    {
        self.calls.launch += 1;
        if self.fail_launch {
            return None;
        }
        self.process_alive = true;
        self.stop_index = 0;
        Some(ProcessHandle(1))
    }

    fn resume(&mut self, process: ProcessHandle) -> Option<ProcessHandle>
    {
        self.calls.resume += 1;
        if self.fail_resume || !self.process_alive {
            return None;
        }
        self.advance();
        if self.current_state() == RunState::Exited {
            self.process_alive = false;
        }
        Some(process)
    }

    fn process_state(&self, _process: ProcessHandle) -> RunState
    {
        self.current_state()
    }

    fn process_id(&self, _process: ProcessHandle) -> u64
    {
        4242
    }

    fn selected_thread(&self, _process: ProcessHandle) -> Option<ThreadHandle>
    {
        if self.process_alive && self.current_state() == RunState::Stopped {
            Some(ThreadHandle(1))
        } else {
            None
        }
    }

    fn stop_description(&self, _thread: ThreadHandle) -> Option<String>
    {
        if self.stop_reason.is_empty() {
            None
        } else {
            Some(self.stop_reason.clone())
        }
    }

    fn step_instruction(&mut self, _thread: ThreadHandle, _step_over: bool) -> Result<(), BackendError>
    {
        self.calls.step_instruction += 1;
        if !self.process_alive {
            return Err(BackendError::StepFailed);
        }
        self.advance();
        if self.current_state() == RunState::Exited {
            self.process_alive = false;
        }
        Ok(())
    }

    fn selected_frame(&self, _thread: ThreadHandle) -> Option<FrameHandle>
    {
        if self.current_state() == RunState::Stopped {
            Some(FrameHandle(1))
        } else {
            None
        }
    }

    fn disassemble(&self, _frame: FrameHandle) -> String
    {
        self.disassembly.clone()
    }

    fn registers(&self, _frame: FrameHandle) -> Vec<(String, String)>
    {
        if self.register_script.is_empty() {
            return Vec::new();
        }
        let index = self.stop_index.min(self.register_script.len() - 1);
        self.register_script[index].clone()
    }

    fn read_memory(&mut self, _process: ProcessHandle, address: u64, len: usize) -> Result<Vec<u8>, BackendError>
    {
        self.calls.read_memory += 1;
        // A request whose end wraps past the address space cannot land in
        // any region.
        let Some(request_end) = address.checked_add(len as u64) else {
            return Err(BackendError::MemoryRead(address));
        };
        for region in &self.regions {
            let end = region.base + region.bytes.len() as u64;
            if address >= region.base && request_end <= end {
                let start = (address - region.base) as usize;
                return Ok(region.bytes[start..start + len].to_vec());
            }
        }
        Err(BackendError::MemoryRead(address))
    }

    fn read_pointer(&mut self, _process: ProcessHandle, address: u64) -> Result<u64, BackendError>
    {
        self.calls.read_pointer += 1;
        self.pointers.get(&address).copied().ok_or(BackendError::PointerRead(address))
    }

    fn symbols(&self, _target: TargetHandle) -> Vec<SymbolInfo>
    {
        self.symbol_table.clone()
    }

    fn destroy_process(&mut self, _process: ProcessHandle) -> Result<(), BackendError>
    {
        self.calls.destroy_process += 1;
        self.process_alive = false;
        Ok(())
    }
}
