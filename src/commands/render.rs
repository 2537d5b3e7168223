use crate::api;
use crate::cli::RenderArgs;
use crate::fs::{FileSystem, default_fs};
use crate::snapshot::save_snapshot;
use crate::style;
use std::io::Write;

use super::CommandContext;

pub fn cmd_render(args: RenderArgs) -> i32 {
    cmd_render_with_fs(args, default_fs())
}

pub fn cmd_render_with_fs(args: RenderArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = CommandContext::new(&args.layout, args.interactive, fs);
    let mut outcome = match ctx.build_graph(&args.layout, fs) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };

    let mut svg = Vec::new();
    if let Err(e) = api::write_svg(&mut outcome.graph, &ctx.options, &mut svg) {
        style::error(&format!("Failed to render SVG: {}", e));
        return 1;
    }

    match &args.output {
        Some(path) => {
            if let Err(e) = fs.write(path, &String::from_utf8_lossy(&svg)) {
                style::error(&format!("Failed to write {}: {}", style::path(path), e));
                return 1;
            }
            style::success(&format!(
                "Rendered {} modules in {} steps to {}",
                outcome.graph.len(),
                outcome.steps,
                style::path(path)
            ));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(&svg).and_then(|_| stdout.flush()) {
                style::error(&format!("Failed to write SVG: {}", e));
                return 1;
            }
        }
    }

    if let Some(path) = &args.save_snapshot {
        if let Err(e) = save_snapshot(fs, &outcome.graph.to_snapshot(), path) {
            style::error(&format!("Failed to save snapshot: {}", e));
            return 1;
        }
        style::success(&format!("Snapshot saved to {}", style::path(path)));
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LayoutArgs;
    use crate::fs::mock::MockFs;
    use crate::snapshot::load_snapshot;
    use std::path::{Path, PathBuf};

    const STATS: &str = r#"{
        "modules": [{}, {}],
        "chunks": { "main.js": { "modules": [
            { "id": 0, "size": 100, "request": "/app/a.js",
              "reasons": [{ "type": "require", "module": "/app/b.js" }] },
            { "id": 1, "size": 100, "request": "/app/b.js" }
        ] } }
    }"#;

    fn args(output: &str) -> RenderArgs {
        RenderArgs {
            layout: LayoutArgs {
                input: Some(PathBuf::from("/in/stats.json")),
                steps: Some(30),
                seed: Some(1),
                config_dir: PathBuf::from("/in"),
                ..Default::default()
            },
            output: Some(PathBuf::from(output)),
            interactive: false,
            save_snapshot: None,
        }
    }

    #[test]
    fn test_render_writes_svg_and_snapshot() {
        let fs = MockFs::with_files([(Path::new("/in/stats.json"), STATS)]);
        let mut args = args("/out/graph.svg");
        args.save_snapshot = Some(PathBuf::from("/out/layout.json"));

        assert_eq!(cmd_render_with_fs(args, &fs), 0);

        let svg = fs.read_to_string(Path::new("/out/graph.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"id="module0line0""#));
        let snapshot = load_snapshot(&fs, Path::new("/out/layout.json")).unwrap();
        assert_eq!(snapshot.modules_list.len(), 2);
        assert!(!snapshot.colors_map.is_empty());
    }

    #[test]
    fn test_render_from_snapshot() {
        let fs = MockFs::with_files([(Path::new("/in/stats.json"), STATS)]);
        let mut first = args("/out/first.svg");
        first.save_snapshot = Some(PathBuf::from("/out/layout.json"));
        assert_eq!(cmd_render_with_fs(first, &fs), 0);

        let mut resumed = args("/out/second.svg");
        resumed.layout.input = None;
        resumed.layout.from_snapshot = Some(PathBuf::from("/out/layout.json"));
        assert_eq!(cmd_render_with_fs(resumed, &fs), 0);
        assert!(fs.exists(Path::new("/out/second.svg")));
    }

    #[test]
    fn test_render_resumes_interactive_document() {
        let fs = MockFs::with_files([(Path::new("/in/stats.json"), STATS)]);
        let mut first = args("/out/live.svg");
        first.interactive = true;
        assert_eq!(cmd_render_with_fs(first, &fs), 0);

        let mut resumed = args("/out/again.svg");
        resumed.layout.input = None;
        resumed.layout.from_snapshot = Some(PathBuf::from("/out/live.svg"));
        resumed.save_snapshot = Some(PathBuf::from("/out/layout.json"));
        assert_eq!(cmd_render_with_fs(resumed, &fs), 0);

        let snapshot = load_snapshot(&fs, Path::new("/out/layout.json")).unwrap();
        assert_eq!(snapshot.modules_list.len(), 2);
    }

    #[test]
    fn test_render_from_static_document_fails() {
        let fs = MockFs::with_files([(Path::new("/in/stats.json"), STATS)]);
        assert_eq!(cmd_render_with_fs(args("/out/static.svg"), &fs), 0);

        let mut resumed = args("/out/again.svg");
        resumed.layout.input = None;
        resumed.layout.from_snapshot = Some(PathBuf::from("/out/static.svg"));
        assert_eq!(cmd_render_with_fs(resumed, &fs), 1);
    }

    #[test]
    fn test_render_missing_input_fails() {
        let fs = MockFs::new();
        assert_eq!(cmd_render_with_fs(args("/out/graph.svg"), &fs), 1);
        assert!(!fs.exists(Path::new("/out/graph.svg")));
    }

    #[test]
    fn test_render_empty_report_fails() {
        let fs = MockFs::with_files([(Path::new("/in/stats.json"), r#"{ "chunks": {} }"#)]);
        assert_eq!(cmd_render_with_fs(args("/out/graph.svg"), &fs), 1);
    }
}
