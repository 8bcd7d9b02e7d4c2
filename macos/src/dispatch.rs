// Main-queue dispatch via libdispatch.
//
// AppKit window objects may only be touched on the main thread. Mutations are
// queued with dispatch_async_f and never waited on; lookups that need an
// answer use dispatch_sync_f, or run inline when already on the main thread
// (a sync dispatch onto the queue we are draining would deadlock).

use std::ffi::c_void;
use std::ptr::addr_of;

extern "C" {
    static _dispatch_main_q: c_void;

    fn dispatch_async_f(
        queue: *const c_void,
        context: *mut c_void,
        work: extern "C" fn(*mut c_void),
    );

    fn dispatch_sync_f(
        queue: *const c_void,
        context: *mut c_void,
        work: extern "C" fn(*mut c_void),
    );

    fn pthread_main_np() -> i32;
}

type Job = Box<dyn FnOnce() + Send>;

extern "C" fn run_job(context: *mut c_void) {
    // SAFETY: context comes from Box::into_raw in main_async and is consumed once
    let job = unsafe { Box::from_raw(context.cast::<Job>()) };
    job();
}

/// Queues `job` on the main thread and returns immediately.
pub(crate) fn main_async<F>(job: F)
where
    F: FnOnce() + Send + 'static,
{
    let job: Box<Job> = Box::new(Box::new(job));
    unsafe {
        dispatch_async_f(
            addr_of!(_dispatch_main_q),
            Box::into_raw(job).cast(),
            run_job,
        );
    }
}

struct SyncSlot<F, R> {
    job: Option<F>,
    result: Option<R>,
}

extern "C" fn run_sync_slot<F, R>(context: *mut c_void)
where
    F: FnOnce() -> R,
{
    // SAFETY: context points at a SyncSlot that main_sync keeps alive until
    // dispatch_sync_f returns
    let slot = unsafe { &mut *context.cast::<SyncSlot<F, R>>() };
    if let Some(job) = slot.job.take() {
        slot.result = Some(job());
    }
}

/// Runs `job` on the main thread and waits for its result.
pub(crate) fn main_sync<F, R>(job: F) -> Option<R>
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    if unsafe { pthread_main_np() } != 0 {
        return Some(job());
    }

    let mut slot = SyncSlot {
        job: Some(job),
        result: None,
    };
    unsafe {
        dispatch_sync_f(
            addr_of!(_dispatch_main_q),
            (&mut slot as *mut SyncSlot<F, R>).cast(),
            run_sync_slot::<F, R>,
        );
    }
    slot.result
}
