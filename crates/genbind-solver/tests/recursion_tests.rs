use super::*;

#[test]
fn test_profile_limits() {
    assert_eq!(RecursionProfile::Unification.max_depth(), 50);
    assert_eq!(RecursionProfile::Hierarchy.max_depth(), 64);
    assert_eq!(RecursionProfile::Assignability.max_depth(), 100);
    assert_eq!(RecursionProfile::Unification.max_iterations(), 100_000);

    let custom = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 10,
    };
    assert_eq!(custom.max_depth(), 3);
    assert_eq!(custom.max_iterations(), 10);
}

#[test]
fn test_enter_leave() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1), RecursionResult::Entered);
    guard.leave(1);
    assert_eq!(guard.enter(1), RecursionResult::Entered);
    guard.leave(1);
}

#[test]
fn test_cycle_detection() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(1), RecursionResult::Cycle);
    assert!(!guard.is_exceeded());
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn test_depth_exceeded() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(2, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
    guard.leave(2);
    guard.leave(1);
}

#[test]
fn test_iteration_exceeded() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 3);
    for key in 0..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(4), RecursionResult::IterationExceeded);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_limit_checked_before_cycle() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 1);
    assert!(guard.enter(1).is_entered());
    assert_eq!(guard.enter(1), RecursionResult::IterationExceeded);
    guard.leave(1);
}

#[test]
fn test_with_profile_uses_profile_limits() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Custom {
        max_depth: 1,
        max_iterations: 100,
    });
    assert!(guard.enter(1).is_entered());
    assert_eq!(guard.enter(2), RecursionResult::DepthExceeded);
    guard.leave(1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "RecursionGuard dropped")]
fn test_drop_with_active_entries_panics() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
    let _ = guard.enter(1);
}
