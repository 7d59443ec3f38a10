//! Tests for the interruptible lock
//!
//! These tests verify:
//! - Mutual exclusion and value hand-back on guard drop
//! - try_lock behavior while held
//! - Cancellation of blocked waiters
//! - Uncontended acquisition ignores an already fired token

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scull::device::{CancelToken, InterruptibleMutex};
use scull::ScullError;

// =============================================================================
// Basic Locking Tests
// =============================================================================

#[test]
fn test_lock_and_modify() {
    let mutex = InterruptibleMutex::new(5u32);

    {
        let mut guard = mutex.lock(None).unwrap();
        *guard += 1;
    }

    assert_eq!(*mutex.lock(None).unwrap(), 6);
}

#[test]
fn test_try_lock_while_held() {
    let mutex = InterruptibleMutex::new(0u32);

    let guard = mutex.lock(None).unwrap();
    assert!(mutex.is_locked());
    assert!(mutex.try_lock().is_none());

    drop(guard);
    assert!(!mutex.is_locked());
    assert!(mutex.try_lock().is_some());
}

#[test]
fn test_concurrent_increments() {
    let mutex = Arc::new(InterruptibleMutex::new(0u64));

    let mut handles = vec![];
    for _ in 0..8 {
        let mutex = Arc::clone(&mutex);
        handles.push(thread::spawn(move || {
            for _ in 0..1000 {
                let mut guard = mutex.lock(None).unwrap();
                *guard += 1;
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(*mutex.lock(None).unwrap(), 8000);
}

#[test]
fn test_blocked_waiter_acquires_after_release() {
    let mutex = Arc::new(InterruptibleMutex::new(Vec::<u32>::new()));
    let guard = mutex.lock(None).unwrap();

    let (tx, rx) = mpsc::channel();
    let waiter = {
        let mutex = Arc::clone(&mutex);
        thread::spawn(move || {
            let mut guard = mutex.lock(None).unwrap();
            guard.push(2);
            tx.send(()).unwrap();
        })
    };

    // the waiter cannot get in while we hold the guard
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    drop(guard);

    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    waiter.join().unwrap();
    assert_eq!(*mutex.lock(None).unwrap(), vec![2]);
}

// =============================================================================
// Cancellation Tests
// =============================================================================

#[test]
fn test_cancel_interrupts_waiter() {
    let mutex = Arc::new(InterruptibleMutex::new(0u32));
    let guard = mutex.lock(None).unwrap();
    let token = CancelToken::new();

    let (tx, rx) = mpsc::channel();
    let waiter = {
        let mutex = Arc::clone(&mutex);
        let token = token.clone();
        thread::spawn(move || {
            let result = mutex.lock(Some(&token)).map(|g| *g);
            tx.send(result).unwrap();
        })
    };

    thread::sleep(Duration::from_millis(50));
    token.cancel();

    let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(matches!(result, Err(ScullError::Interrupted)));
    waiter.join().unwrap();

    // the holder still owns the value; nothing was taken
    assert!(mutex.is_locked());
    drop(guard);
    assert_eq!(*mutex.lock(None).unwrap(), 0);
}

#[test]
fn test_cancelled_token_with_contended_lock_fails_fast() {
    let mutex = InterruptibleMutex::new(0u32);
    let _guard = mutex.lock(None).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let result = mutex.lock(Some(&token));

    assert!(matches!(result, Err(ScullError::Interrupted)));
}

#[test]
fn test_cancelled_token_with_free_lock_succeeds() {
    let mutex = InterruptibleMutex::new(7u32);
    let token = CancelToken::new();
    token.cancel();

    let guard = mutex.lock(Some(&token)).unwrap();

    assert_eq!(*guard, 7);
}

#[test]
fn test_cancel_wakes_all_waiters() {
    let mutex = Arc::new(InterruptibleMutex::new(()));
    let _guard = mutex.lock(None).unwrap();
    let token = CancelToken::new();

    let (tx, rx) = mpsc::channel();
    let mut handles = vec![];
    for _ in 0..4 {
        let mutex = Arc::clone(&mutex);
        let token = token.clone();
        let tx = tx.clone();
        handles.push(thread::spawn(move || {
            let interrupted = matches!(mutex.lock(Some(&token)), Err(ScullError::Interrupted));
            tx.send(interrupted).unwrap();
        }));
    }

    thread::sleep(Duration::from_millis(50));
    token.cancel();

    for _ in 0..4 {
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_token_state() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!token.is_cancelled());

    clone.cancel();

    assert!(token.is_cancelled());
    assert!(clone.is_cancelled());
    // cancelling twice is harmless
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_interrupted_is_retryable() {
    assert!(ScullError::Interrupted.is_retryable());
    assert!(!ScullError::OutOfMemory("x".to_string()).is_retryable());
}
