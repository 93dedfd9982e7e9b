//! URL segment assembly
//!
//! Renders a route's segments into a URL path:
//! - `[]` → `/`
//! - `["home", "sub1"]` → `/home/sub1/` (directory URLs + trailing slash)
//! - `["home", "sub1"]` → `/sub1/` when `home` is the hidden top-level section
//!
//! Segments are emitted verbatim; encoding happened when they were produced.

use siteroute_core::SegmentOptions;

/// Assemble a URL path from route segments
///
/// `hidden_root` is the segment of the first root section; it is dropped from
/// the front of the path when `options.hide_top_level` is set. Other root
/// sections are left alone.
pub fn assemble(segments: &[&str], options: &SegmentOptions, hidden_root: Option<&str>) -> String {
    let visible = match (options.hide_top_level, hidden_root, segments.first()) {
        (true, Some(hidden), Some(first)) if *first == hidden => &segments[1..],
        _ => segments,
    };

    if visible.is_empty() {
        return "/".to_string();
    }

    let mut path = String::with_capacity(visible.iter().map(|s| s.len() + 1).sum::<usize>() + 1);
    for segment in visible {
        path.push('/');
        path.push_str(segment);
    }

    if options.use_directory_urls && options.add_trailing_slash && !path.ends_with('/') {
        path.push('/');
    }

    path
}
