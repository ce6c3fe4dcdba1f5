//! System-wide names for shared segments.

/// Longest segment name passed to `shm_open`, leaving room for the leading slash
/// and the terminator within `NAME_MAX`.
pub const MAX_SHARED_NAME_LEN: usize = 250;

/// Build the segment name for a matrix called `name`.
///
/// The layout is `{prefix}{ppid}_{pid}_{name}`, or
/// `{prefix}{ppid}_{pid}_{counter:x}_{name}` once `counter` is nonzero. Every `/`
/// becomes `_` and the result is cut to [`MAX_SHARED_NAME_LEN`] bytes.
pub fn shared_name(prefix: &str, name: &str, counter: usize) -> String {
    let ppid = std::os::unix::process::parent_id();
    let pid = std::process::id();

    let mut out = if counter > 0 {
        format!("{}{}_{}_{:x}_{}", prefix, ppid, pid, counter, name)
    } else {
        format!("{}{}_{}_{}", prefix, ppid, pid, name)
    };

    out = out.replace('/', "_");
    truncate_name(&mut out);
    out
}

/// Cut `name` to at most [`MAX_SHARED_NAME_LEN`] bytes on a character boundary.
fn truncate_name(name: &mut String) {
    if name.len() <= MAX_SHARED_NAME_LEN {
        return;
    }
    let mut end = MAX_SHARED_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_name_layout() {
        let pid = std::process::id();
        let ppid = std::os::unix::process::parent_id();

        assert_eq!(
            shared_name("__viz__", "nodes", 0),
            format!("__viz__{}_{}_nodes", ppid, pid)
        );
        assert_eq!(
            shared_name("__viz__", "nodes", 26),
            format!("__viz__{}_{}_1a_nodes", ppid, pid)
        );
    }

    #[test]
    fn test_shared_name_replaces_slashes() {
        let name = shared_name("p", "a/b/c", 0);
        assert!(!name.contains('/'));
        assert!(name.ends_with("_a_b_c"));
    }

    #[test]
    fn test_shared_name_truncated() {
        let long = "x".repeat(400);
        assert_eq!(shared_name("__viz__", &long, 0).len(), MAX_SHARED_NAME_LEN);

        let mut wide = "é".repeat(200);
        truncate_name(&mut wide);
        assert!(wide.len() <= MAX_SHARED_NAME_LEN);
        assert_eq!(wide.len() % 2, 0);
    }
}
