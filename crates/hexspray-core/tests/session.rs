//! Tests for the session state machine, driven against the scripted
//! engine.

use hexspray_core::backend::scripted::ScriptedBackend;
use hexspray_core::backend::RunState;
use hexspray_core::decode::{FieldValue, TypeTag};
use hexspray_core::error::{BackendError, SessionError, StateError, UserInputError, Warning};
use hexspray_core::session::{DisassemblyView, Phase, Session};

/// A backend with one target, a `main` breakpoint, two stops, and a small
/// readable region at 0x1000 whose pointer slot resolves.
fn stocked_backend() -> ScriptedBackend
{
    ScriptedBackend::new()
        .with_target("a.out")
        .with_breakpoint_symbol("main", 1)
        .with_stops(vec![RunState::Stopped, RunState::Stopped, RunState::Exited])
        .with_registers(vec![
            vec![
                ("rax".to_string(), "0x0000000000001000".to_string()),
                ("rbx".to_string(), "0x0000000000000002".to_string()),
                ("al".to_string(), "0x00".to_string()),
            ],
            vec![
                ("rax".to_string(), "0x0000000000001008".to_string()),
                ("rbx".to_string(), "0x0000000000000002".to_string()),
                ("al".to_string(), "0x08".to_string()),
            ],
        ])
        .with_memory(0x1000, b"hello scripted engine!!!........".to_vec())
        .with_pointer(0x1000, 0x2000)
        .with_disassembly("a.out`main:\n->  0x1000 <+0>: nop\n")
        .with_stop_reason("breakpoint 1.1")
}

fn stocked_session() -> Session<ScriptedBackend>
{
    let mut session = Session::new(stocked_backend());
    session.set_target("a.out").unwrap();
    session
}

#[test]
fn test_initial_phase_is_no_target()
{
    let session = Session::new(ScriptedBackend::new());
    assert_eq!(session.phase(), Phase::NoTarget);
}

#[test]
fn test_set_target_transitions_to_target_set()
{
    let session = stocked_session();
    assert_eq!(session.phase(), Phase::TargetSet);
}

#[test]
fn test_set_target_rejects_empty_path()
{
    let mut session = Session::new(ScriptedBackend::new());
    let error = session.set_target("   ").unwrap_err();
    assert_eq!(error, SessionError::User(UserInputError::EmptyTargetPath));
    assert_eq!(session.phase(), Phase::NoTarget);
}

#[test]
fn test_set_target_unknown_path_reports_backend_error()
{
    let mut session = Session::new(ScriptedBackend::new());
    let error = session.set_target("missing").unwrap_err();
    assert_eq!(error, SessionError::Backend(BackendError::TargetNotFound("missing".to_string())));
    assert_eq!(session.phase(), Phase::NoTarget);
}

#[test]
fn test_run_without_target_makes_no_backend_call()
{
    let mut session = Session::new(ScriptedBackend::new());
    let error = session.run().unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoTarget));
    assert_eq!(session.backend().calls.launch, 0);
}

#[test]
fn test_run_stops_at_first_breakpoint()
{
    let mut session = stocked_session();
    let update = session.run().unwrap();

    assert_eq!(session.phase(), Phase::Stopped);
    assert!(matches!(update.disassembly, DisassemblyView::Listing(ref text) if text.contains("main:")));
    assert_eq!(update.registers.b64.len(), 2);
    assert_eq!(update.summary.target.as_deref(), Some("a.out"));
    assert_eq!(update.summary.process, Some((4242, "stopped")));
    assert_eq!(update.summary.stop_description.as_deref(), Some("breakpoint 1.1"));
}

#[test]
fn test_run_twice_rejected_while_process_live()
{
    let mut session = stocked_session();
    session.run().unwrap();
    let error = session.run().unwrap_err();
    assert_eq!(error, SessionError::State(StateError::ProcessAlreadyLive));
    assert_eq!(session.backend().calls.launch, 1);
}

#[test]
fn test_launch_failure_leaves_state_unchanged()
{
    let mut session = Session::new(stocked_backend().with_failing_launch());
    session.set_target("a.out").unwrap();
    let error = session.run().unwrap_err();
    assert_eq!(error, SessionError::Backend(BackendError::LaunchFailed));
    assert_eq!(session.phase(), Phase::TargetSet);
}

#[test]
fn test_step_marks_changed_registers()
{
    let mut session = stocked_session();
    let first = session.run().unwrap();
    assert!(first.registers.b64.iter().all(|cell| !cell.changed), "first stop has no baseline");

    let update = session.step(true).unwrap();
    let rax = &update.registers.b64[0];
    let rbx = &update.registers.b64[1];
    assert_eq!(rax.name, "rax");
    assert!(rax.changed);
    assert!(!rbx.changed);
    assert!(update.registers.b8[0].changed, "al moved too");
}

#[test]
fn test_step_without_process_makes_no_backend_call()
{
    let mut session = stocked_session();
    let error = session.step(true).unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoProcess));
    assert_eq!(session.backend().calls.step_instruction, 0);
}

#[test]
fn test_step_after_exit_reports_not_stopped()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.step(true).unwrap();
    session.continue_run().unwrap();
    assert_eq!(session.phase(), Phase::Exited);

    let error = session.step(false).unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NotStopped));
    assert_eq!(session.backend().calls.step_instruction, 1);
}

#[test]
fn test_continue_to_exit_clears_disassembly()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.step(true).unwrap();
    let update = session.continue_run().unwrap();

    assert_eq!(session.phase(), Phase::Exited);
    assert_eq!(update.disassembly, DisassemblyView::Exited);
    assert!(update.registers.is_empty());
    assert_eq!(update.summary.process, Some((4242, "exited")));
}

#[test]
fn test_continue_without_process_rejected()
{
    let mut session = stocked_session();
    let error = session.continue_run().unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoProcess));
    assert_eq!(session.backend().calls.resume, 0);
}

#[test]
fn test_continue_failure_reported()
{
    let mut session = Session::new(stocked_backend().with_failing_resume());
    session.set_target("a.out").unwrap();
    session.run().unwrap();
    let error = session.continue_run().unwrap_err();
    assert_eq!(error, SessionError::Backend(BackendError::ContinueFailed));
}

#[test]
fn test_continue_failure_still_refreshes_views()
{
    let mut session = Session::new(stocked_backend().with_failing_resume());
    session.set_target("a.out").unwrap();
    session.run().unwrap();
    session.continue_run().unwrap_err();

    // The failed continue refreshed before reporting; the retrievable
    // view reflects the engine's post-attempt state.
    let view = session.view();
    assert_eq!(view.summary.process, Some((4242, "stopped")));
    assert!(matches!(view.disassembly, DisassemblyView::Listing(_)));
    assert_eq!(view.registers.b64.len(), 2);
}

#[test]
fn test_breakpoint_requires_target()
{
    let mut session = Session::new(ScriptedBackend::new());
    let error = session.set_breakpoint("main").unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoTarget));
}

#[test]
fn test_breakpoint_dedup_keeps_one_entry()
{
    let mut session = stocked_session();
    session.set_breakpoint("main").unwrap();
    let error = session.set_breakpoint("main").unwrap_err();

    assert_eq!(
        error,
        SessionError::User(UserInputError::DuplicateBreakpoint("main".to_string()))
    );
    assert_eq!(session.breakpoints().len(), 1);
    // The duplicate never reached the engine.
    assert_eq!(session.backend().calls.create_breakpoint, 1);
}

#[test]
fn test_breakpoint_with_zero_locations_warns_but_sticks()
{
    let mut session = Session::new(stocked_backend().with_breakpoint_symbol("ghost", 0));
    session.set_target("a.out").unwrap();

    let outcome = session.set_breakpoint("ghost").unwrap();
    assert_eq!(outcome.location_count, 0);
    assert_eq!(
        outcome.warning,
        Some(Warning::NoLocations {
            symbol: "ghost".to_string()
        })
    );
    assert!(session.breakpoints().contains("ghost"));
}

#[test]
fn test_breakpoint_backend_failure_not_recorded()
{
    let mut session = Session::new(stocked_backend().with_failing_breakpoint("broken"));
    session.set_target("a.out").unwrap();

    let error = session.set_breakpoint("broken").unwrap_err();
    assert_eq!(error, SessionError::Backend(BackendError::BreakpointFailed("broken".to_string())));
    assert!(!session.breakpoints().contains("broken"));
}

#[test]
fn test_new_target_resets_breakpoints_and_baseline()
{
    let mut session = Session::new(stocked_backend().with_target("b.out"));
    session.set_target("a.out").unwrap();
    session.set_breakpoint("main").unwrap();
    session.run().unwrap();

    session.set_target("b.out").unwrap();
    assert!(session.breakpoints().is_empty());
    assert_eq!(session.phase(), Phase::TargetSet);

    // First stop after the reset is a fresh baseline: nothing is marked.
    let update = session.run().unwrap();
    assert!(update.registers.b64.iter().all(|cell| !cell.changed));
}

#[test]
fn test_examine_requires_live_process()
{
    let mut session = stocked_session();
    let error = session.examine("1000").unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoProcess));
}

#[test]
fn test_examine_literal_mode_decodes_address_bytes()
{
    let mut session = stocked_session();
    session.run().unwrap();

    let inspection = session.examine("1000").unwrap();
    assert_eq!(inspection.address.value(), 0x1000);
    assert!(!inspection.dereferencing);
    assert!(!inspection.deref_failed);

    // The buffer is the address string's own bytes in string order.
    let expected = u64::from_le_bytes(0x1000u64.to_be_bytes()).to_string();
    assert_eq!(*inspection.spray.field(TypeTag::U64), FieldValue::Value(expected));
    // The ptr field dereferences the examined address through the engine.
    assert_eq!(
        *inspection.spray.field(TypeTag::Ptr),
        FieldValue::Value("0x0000000000002000".to_string())
    );
}

#[test]
fn test_examine_substitutes_registers_from_last_stop()
{
    let mut session = stocked_session();
    session.run().unwrap();

    // rax printed as 0x0000000000001000 at the first stop.
    let inspection = session.examine("rax").unwrap();
    assert_eq!(inspection.address.value(), 0x1000);
}

#[test]
fn test_examine_invalid_expression_rejected()
{
    let mut session = stocked_session();
    session.run().unwrap();
    let error = session.examine("what?").unwrap_err();
    assert_eq!(error, SessionError::User(UserInputError::InvalidExpression));
}

#[test]
fn test_toggle_dereference_decodes_live_memory()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.examine("1000").unwrap();

    let inspection = session.toggle_dereference().unwrap().expect("re-decode of last expression");
    assert!(inspection.dereferencing);
    assert!(!inspection.deref_failed);

    // Live bytes at 0x1000 start with "hello sc".
    assert_eq!(
        inspection.memory_view.map(|a| a.value()),
        Some(u64::from_be_bytes(*b"hello sc"))
    );
    // The live read covers 16 bytes, so the str field is exactly the
    // first 16 characters of the region.
    assert_eq!(*inspection.spray.field(TypeTag::Str), FieldValue::Value("hello scripted e".to_string()));
}

#[test]
fn test_examine_with_deref_reads_through_the_engine()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.toggle_dereference().unwrap();

    session.examine("1000").unwrap();
    assert_eq!(session.backend().calls.read_memory, 1);
    // One pointer read for the spray's ptr field.
    assert_eq!(session.backend().calls.read_pointer, 1);
}

#[test]
fn test_deref_at_top_of_address_space_fails_cleanly()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.toggle_dereference().unwrap();

    // The 16-byte window past u64::MAX cannot land in any region; the
    // read must fail as an ordinary memory error, not wrap around.
    let inspection = session.examine("ffffffffffffffff").unwrap();
    assert!(inspection.deref_failed);
    assert_eq!(inspection.memory_view, None);
}

#[test]
fn test_deref_read_failure_blanks_every_field()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.toggle_dereference().unwrap();

    // Nothing is mapped at 0xdead000.
    let inspection = session.examine("dead000").unwrap();
    assert!(inspection.deref_failed);
    assert_eq!(inspection.memory_view, None);
    for tag in TypeTag::ALL {
        assert_eq!(*inspection.spray.field(tag), FieldValue::Blank);
    }
}

#[test]
fn test_toggle_without_expression_changes_only_the_flag()
{
    let mut session = stocked_session();
    assert!(!session.dereferencing());
    let inspection = session.toggle_dereference().unwrap();
    assert!(inspection.is_none());
    assert!(session.dereferencing());
}

#[test]
fn test_list_symbols_requires_target()
{
    let session = Session::new(ScriptedBackend::new());
    let error = session.list_symbols().unwrap_err();
    assert_eq!(error, SessionError::State(StateError::NoTarget));
}

#[test]
fn test_list_symbols_returns_descriptors()
{
    let mut session = Session::new(stocked_backend().with_symbol(7, "[0x1000-0x1040)", "main"));
    session.set_target("a.out").unwrap();
    let symbols = session.list_symbols().unwrap();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].name, "main");
}

#[test]
fn test_quit_destroys_live_process()
{
    let mut session = stocked_session();
    session.run().unwrap();
    session.quit().unwrap();
    assert_eq!(session.backend().calls.destroy_process, 1);
    assert_eq!(session.phase(), Phase::TargetSet);
}

#[test]
fn test_quit_without_process_is_a_no_op()
{
    let mut session = stocked_session();
    session.quit().unwrap();
    assert_eq!(session.backend().calls.destroy_process, 0);
}
