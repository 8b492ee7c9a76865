//! Access modes of a key.

use bitflags::bitflags;

bitflags! {
    /// Controls how a [`Key`](crate::Key) synchronizes with an environment.
    ///
    /// ```rust
    /// use twig_keys::Mode;
    ///
    /// // Pulled from and pushed to the environment, must be present on pull
    /// let strict = Mode::READ_WRITE | Mode::REQUIRED;
    /// assert!(strict.is_required());
    ///
    /// // Never touches the environment
    /// assert!(Mode::RESERVED.is_reserved());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mode: u8 {
        /// Acquire reads the environment binding into the key.
        const READ = 1;
        /// Apply and clobber write the key's value into the environment.
        const WRITE = 2;
        /// With `READ`, acquiring fails if the environment lacks the binding.
        const REQUIRED = 4;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl Mode {
    /// No access at all.
    pub const RESERVED: Mode = Mode::empty();

    pub fn is_reserved(self) -> bool {
        self.is_empty()
    }

    pub fn can_read(self) -> bool {
        self.contains(Mode::READ)
    }

    pub fn can_write(self) -> bool {
        self.contains(Mode::WRITE)
    }

    pub fn is_required(self) -> bool {
        self.contains(Mode::REQUIRED)
    }
}
