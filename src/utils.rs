use std::sync::atomic::{AtomicPtr, Ordering};
use std::ptr;

/// A cell holding a value that is initialized at most once and then shared
/// as `&'static`.
///
/// Initialization is not synchronised; racing initializers are allowed to
/// run, and only the first result is kept. Both the configuration and the
/// database pool are stored in cells of this type.
#[derive(Debug)]
pub struct SingleInit<T> {
    cell: AtomicPtr<T>,
}

impl<T> SingleInit<T> {
    /// Create a new uninitialized cell.
    pub const fn uninit() -> Self {
        SingleInit {
            cell: AtomicPtr::new(ptr::null_mut()),
        }
    }
}

impl<T> SingleInit<T>
where
    T: Sync,
    Self: 'static,
{
    /// Get the stored value, or `None` if it hasn't been initialized yet.
    pub fn get(&self) -> Option<&'static T> {
        let ptr = self.cell.load(Ordering::Acquire);

        if ptr.is_null() {
            None
        } else {
            Some(unsafe { &*ptr })
        }
    }

    /// Get the stored value, initializing it if necessary.
    pub fn get_or_init<F>(&self, init: F) -> &'static T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init::<(), _>(|| Ok(init())) {
            Ok(v) => v,
            Err(()) => unreachable!(),
        }
    }

    /// Same as [`SingleInit::get_or_init`] except that the initialization
    /// function can fail.
    ///
    /// On failure the cell is left untouched, and initialization can safely
    /// be attempted again.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&'static T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let value = Box::into_raw(Box::new(init()?));

        match self.cell.compare_exchange(
            ptr::null_mut(), value, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(unsafe { &*value }),
            Err(old) => {
                // Another thread won the race; drop our value and use theirs.
                std::mem::drop(unsafe { Box::from_raw(value) });
                Ok(unsafe { &*old })
            }
        }
    }
}

/// Is `slug` a well-formed slug?
///
/// Slugs are non-empty strings of lowercase ASCII alphanumerics and hyphens,
/// neither starting nor ending with a hyphen. They are the stable lookup key
/// for every named entity, so malformed values are rejected at creation
/// rather than stored.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 255
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug.chars().all(|c| c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-')
}

/// Derive a slug from a display name, the way the admin prepopulates slug
/// fields from their source field.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;

    for chr in name.chars() {
        if chr.is_ascii_alphanumeric() {
            slug.push(chr.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(is_valid_slug("myth"));
        assert!(is_valid_slug("battle-of-five-armies"));
        assert!(is_valid_slug("4th-age"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-myth"));
        assert!(!is_valid_slug("myth-"));
        assert!(!is_valid_slug("Myth"));
        assert!(!is_valid_slug("two words"));
    }

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("Battle of Five Armies"), "battle-of-five-armies");
        assert_eq!(slugify("Aia"), "aia");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn single_init_keeps_first_value() {
        static CELL: SingleInit<u32> = SingleInit::uninit();

        assert_eq!(CELL.get(), None);
        assert_eq!(*CELL.get_or_init(|| 4), 4);
        assert_eq!(*CELL.get_or_init(|| 8), 4);
        assert_eq!(CELL.get(), Some(&4));
    }
}
