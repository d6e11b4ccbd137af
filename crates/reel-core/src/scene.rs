//! Scene-class detection.
//!
//! The renderer needs the name of the scene class to draw. Rather than parse
//! the script, we look for the first line shaped like `class Name(Scene):`.
//! Scripts that subclass other scene types (e.g. `ThreeDScene`) or use
//! multiple bases are not recognised.

const CLASS_KEYWORD: &str = "class ";
const SCENE_BASE_MARKER: &str = "(Scene)";

/// Returns the class name declared on the first qualifying line.
///
/// A qualifying line, once trimmed, starts with `class ` and contains
/// `(Scene)`. Only the first such line is considered; if its class name is
/// empty, no scene is reported.
pub fn extract_scene_name(script: &str) -> Option<&str> {
    let line = script
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(CLASS_KEYWORD) && line.contains(SCENE_BASE_MARKER))?;

    let name = line[CLASS_KEYWORD.len()..]
        .split('(')
        .next()
        .unwrap_or_default()
        .trim();

    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_scene_wins() {
        let script = "from manim import *\n\nclass Intro(Scene):\n    pass\n\nclass Outro(Scene):\n    pass\n";
        assert_eq!(extract_scene_name(script), Some("Intro"));
    }

    #[test]
    fn test_indented_and_crlf_lines() {
        let script = "import manim\r\n    class  Spinning (Scene):\r\n        def construct(self): ...\r\n";
        assert_eq!(extract_scene_name(script), Some("Spinning"));
    }

    #[test]
    fn test_no_scene_class() {
        assert_eq!(extract_scene_name(""), None);
        assert_eq!(extract_scene_name("print('hello')"), None);
        assert_eq!(extract_scene_name("class Helper(object):\n    pass"), None);
        assert_eq!(extract_scene_name("class Fancy(ThreeDScene):\n    pass"), None);
        // Must start with the keyword after trimming.
        assert_eq!(extract_scene_name("# class Commented(Scene):"), None);
    }

    #[test]
    fn test_helper_classes_before_scene_are_skipped() {
        let script = "class Util:\n    pass\nclass Main(Scene):\n    pass";
        assert_eq!(extract_scene_name(script), Some("Main"));
    }

    #[test]
    fn test_empty_name_on_first_match() {
        assert_eq!(extract_scene_name("class (Scene):\nclass Later(Scene):"), None);
    }
}
