use crate::cli::ServeArgs;
use crate::fs::default_fs;
use crate::interactive::{InteractiveController, Session};
use crate::style;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let fs = default_fs();
    let ctx = CommandContext::new(&args.layout, true, fs);
    let outcome = match ctx.build_graph(&args.layout, fs) {
        Ok(outcome) => outcome,
        Err(code) => return code,
    };

    let mut settings = ctx.config.serve.clone();
    if let Some(port) = args.port {
        settings.port = port;
    }

    let controller =
        InteractiveController::new(outcome.graph, ctx.options.clone(), settings.steps_per_tick);
    let session = match Session::new(controller) {
        Ok(session) => session,
        Err(e) => {
            style::error(&format!("Failed to project the layout: {}", e));
            return 1;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::interactive::serve(session, &settings, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
