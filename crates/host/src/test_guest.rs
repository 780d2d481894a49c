//! A minimal guest written directly in wat so the host can be tested against real wasm without
//! a wasm32 toolchain. The Rust guest in `crates/guest` is exercised by `test-crates/tests`.
//!
//! - `allocate` is a bump allocator starting at HEAP_BASE, memory is one page and never grows
//! - `deallocate` only traps when the range ends beyond the heap, otherwise it is a no-op
//! - `string_descriptor` copies the greeting out of a data segment into a fresh allocation
use wasm_marshal_common::GuestPtr;

pub const HEAP_BASE: GuestPtr = 1024;

pub const TEST_GUEST_WAT: &str = r#"(module
  (import "env" "print" (func $print (param i32 i32)))
  (memory (export "memory") 1)
  (global $heap (mut i32) (i32.const 1024))
  (data (i32.const 64) "Hello World! \f0\9f\8c\8e")

  (func $allocate (export "allocate") (param $len i32) (result i32)
    (local $ptr i32)
    (local.set $ptr (global.get $heap))
    (global.set $heap (i32.add (global.get $heap) (local.get $len)))
    (local.get $ptr))

  (func (export "deallocate") (param $ptr i32) (param $len i32)
    (if (i32.gt_u (i32.add (local.get $ptr) (local.get $len)) (global.get $heap))
      (then unreachable)))

  (func (export "read_bytes_from_memory") (param $ptr i32) (param $len i32)
    (call $print (local.get $ptr) (local.get $len)))

  (func (export "read_number_from_memory") (param $ptr i32) (param $len i32) (result f64)
    (if (result f64) (i32.ne (local.get $len) (i32.const 8))
      (then (f64.const nan))
      (else (f64.load (local.get $ptr)))))

  (func (export "string_descriptor") (result i32)
    (local $text i32)
    (local $i i32)
    (local $descriptor i32)
    (local.set $text (call $allocate (i32.const 17)))
    (block $done
      (loop $copy
        (br_if $done (i32.ge_u (local.get $i) (i32.const 17)))
        (i32.store8
          (i32.add (local.get $text) (local.get $i))
          (i32.load8_u (i32.add (i32.const 64) (local.get $i))))
        (local.set $i (i32.add (local.get $i) (i32.const 1)))
        (br $copy)))
    (local.set $descriptor (call $allocate (i32.const 8)))
    (i32.store (local.get $descriptor) (local.get $text))
    (i32.store offset=4 (local.get $descriptor) (i32.const 17))
    (local.get $descriptor))
)"#;
