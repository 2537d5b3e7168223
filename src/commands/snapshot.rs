use crate::cli::SnapshotArgs;
use crate::fs::{FileSystem, default_fs};
use crate::render::SceneBuilder;
use crate::snapshot::save_snapshot;
use crate::style;

use super::CommandContext;

pub fn cmd_snapshot(args: SnapshotArgs) -> i32 {
    cmd_snapshot_with_fs(args, default_fs())
}

pub fn cmd_snapshot_with_fs(args: SnapshotArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = CommandContext::new(&args.layout, false, fs);
    let mut outcome = match ctx.build_graph(&args.layout, fs) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };

    // Persist colours too, so every later render of this layout matches.
    SceneBuilder::prepare(&mut outcome.graph, &ctx.options);
    let snapshot = outcome.graph.to_snapshot();

    if let Err(e) = save_snapshot(fs, &snapshot, &args.save) {
        style::error(&format!("Failed to save snapshot: {}", e));
        return 1;
    }

    style::success(&format!("Snapshot saved to: {}", style::path(&args.save)));
    style::section("Summary");
    eprintln!("{}", style::metric("Modules", snapshot.modules_list.len()));
    eprintln!("{}", style::metric("Links", snapshot.link_count()));
    eprintln!("{}", style::metric("Steps", outcome.steps));
    eprintln!("{}", style::metric("Scale", format!("{:.4}", snapshot.scale)));

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LayoutArgs;
    use crate::fs::mock::MockFs;
    use crate::snapshot::load_snapshot;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_snapshot_command_saves_layout() {
        let fs = MockFs::with_files([(
            Path::new("/in/stats.json"),
            r#"{
                "modules": [{}, {}, {}],
                "chunks": { "main.js": { "modules": [
                    { "id": 0, "size": 10, "request": "a",
                      "reasons": [{ "type": "require", "module": "b" }] },
                    { "id": 1, "size": 10, "request": "b" },
                    { "id": 2, "size": 10, "request": "c" }
                ] } }
            }"#,
        )]);
        let args = SnapshotArgs {
            layout: LayoutArgs {
                input: Some(PathBuf::from("/in/stats.json")),
                steps: Some(25),
                seed: Some(3),
                config_dir: PathBuf::from("/in"),
                ..Default::default()
            },
            save: PathBuf::from("/out/layout.json"),
        };

        assert_eq!(cmd_snapshot_with_fs(args, &fs), 0);

        let snapshot = load_snapshot(&fs, Path::new("/out/layout.json")).unwrap();
        assert_eq!(snapshot.modules_list.len(), 3);
        assert_eq!(snapshot.link_count(), 1);
        assert!(snapshot.scale > 0.0);
        assert_eq!(snapshot.colors_map.files.len(), 1);
    }
}
