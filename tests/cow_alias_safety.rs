//! Alias-safety tests for the copy-on-write matrix substrate: cloning
//! aliases storage, a write-in-place view reaches through an alias, and
//! `.copy()` breaks the link. Mirrors the walkthrough in the source's own
//! end-to-end CoW/WiP demonstration.

use linalg_kernel::{Matrix, Policy};

#[test]
fn clone_aliases_until_first_write() {
    let a = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    assert!(a.is_exclusive());

    let b = a.clone();
    assert!(!a.is_exclusive());
    assert!(!b.is_exclusive());
    assert_eq!(a, b);

    let mut b = b;
    b.set(0, 0, 99.0);
    assert_eq!(a.get(0, 0), 1.0, "writing through b must not disturb a");
    assert_eq!(b.get(0, 0), 99.0);
    assert!(a.is_exclusive());
    assert!(b.is_exclusive());
}

#[test]
fn copy_forces_independence_immediately() {
    let a = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut b = a.clone();
    assert!(!b.is_exclusive());
    b.copy();
    assert!(b.is_exclusive());
    assert!(a.is_exclusive());
}

#[test]
fn write_in_place_view_mutates_through_shared_buffer() {
    let a = Matrix::new(3, 3);
    let mut col = a.vec_view(1);
    assert_eq!(col.policy(), Policy::WriteInPlace);
    col.set(0, 0, 7.0);
    assert_eq!(a.get(0, 1), 7.0, "write-in-place view must alias a's buffer");
}

#[test]
fn copy_on_write_view_does_not_disturb_source_on_write() {
    let a = Matrix::new(3, 3);
    let mut window = a.view(0, 0, 2, 2, false);
    assert_eq!(window.policy(), Policy::CopyOnWrite);
    window.set(0, 0, 5.0);
    assert_eq!(a.get(0, 0), 0.0, "copy-on-write view must materialize before writing");
    assert_eq!(window.get(0, 0), 5.0);
}

#[test]
fn view_original_recovers_full_physical_extent() {
    let a = Matrix::new(4, 4);
    let window = a.view(1, 1, 2, 2, false);
    let back = window.view_original();
    assert_eq!(back.rows(), 4);
    assert_eq!(back.cols(), 4);
}

#[test]
fn pipe_copies_values_without_aliasing() {
    let src = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut dst = Matrix::new(2, 2);
    dst.pipe(&src);
    assert_eq!(dst, src);
    let mut dst = dst;
    dst.set(0, 0, 42.0);
    assert_eq!(src.get(0, 0), 1.0);
}
