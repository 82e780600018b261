//! Default generators and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{RandomUid, TimestampUid, Uid};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generators, creating them if none exist.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("dwuid: could not lock global generator")
}

impl Uid {
    /// Generates a 120-bit timestamp identifier.
    ///
    /// This function employs a global generator and guarantees the process-wide monotonic order
    /// of identifiers generated within the same millisecond, up to the wraparound of the
    /// uniqueness field. On Unix, the generator is reset when the process ID changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::{Uid, UidValue};
    ///
    /// let uid = Uid::timestamp();
    /// println!("{}", uid); // e.g., "4apKkmgGHGzQSfAg3Uw7x"
    /// assert_eq!(uid.version(), 1);
    /// ```
    pub fn timestamp() -> TimestampUid {
        lock_global_gen().get_mut().0.generate()
    }

    /// Generates a 120-bit random identifier from the global generator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dwuid::{Uid, UidValue};
    ///
    /// let uid = Uid::random();
    /// assert_eq!(uid.version(), 2);
    /// assert_eq!(uid.as_big_uint().bits(), 120);
    /// ```
    pub fn random() -> RandomUid {
        lock_global_gen().get_mut().1.generate()
    }
}

mod inner {
    use tracing::trace;

    use crate::{RandomUidGenerator, TimestampUidGenerator, UidRng};

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    ///
    /// Both generators draw from the cryptographically secure random source.
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generators: (TimestampUidGenerator, RandomUidGenerator),
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            trace!("initializing global generators");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generators: (
                    TimestampUidGenerator::with_rng(None, UidRng::new(true))
                        .expect("dwuid: could not initialize global generator"),
                    RandomUidGenerator::with_rng(None, UidRng::new(true))
                        .expect("dwuid: could not initialize global generator"),
                ),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns mutable references to the inner generators, reseting the generator state on
        /// Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut (TimestampUidGenerator, RandomUidGenerator) {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generators
        }
    }
}
