//! Example: a counter part driven by simulated clicks
//!
//! Run with `RUST_LOG=debug` to watch passes and dispatches.

use fos_ui::prelude::*;

struct Counter {
    increment: MessageKey,
    reset: MessageKey,
}

impl Part for Counter {
    type State = u32;

    fn init(&mut self, cx: &mut Init<'_, u32>) {
        cx.on("click", &self.increment, |part, _| part.update(|n| *n += 1));
        cx.on("click", &self.reset, |part, _| part.update(|n| *n = 0));
    }

    fn render(&self, count: &u32, _: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
        tag.h1(()).text("Counter");
        tag.p("#count").text(count.to_string());
        tag.div(".actions").with(|actions| {
            actions.button("#increment").on("click", &self.increment).text("+1");
            actions.button("#reset").on("click", &self.reset).text("reset");
        });
        Ok(())
    }
}

fn click(rt: &mut Runtime<MemoryHost>, id: &str) -> anyhow::Result<()> {
    let target = rt
        .host()
        .resolve(id)
        .ok_or_else(|| anyhow::anyhow!("no element {id:?}"))?;
    let event = rt.host().event("click", target);
    rt.deliver(&event);
    rt.frame()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut rt = fos_ui::launch(
        r#"<div id="app"></div>"#,
        "app",
        |keys| Counter {
            increment: keys.key(),
            reset: keys.key(),
        },
        0,
    )?;

    for _ in 0..3 {
        click(&mut rt, "increment")?;
    }
    let app = rt
        .host()
        .resolve("app")
        .ok_or_else(|| anyhow::anyhow!("app element missing"))?;
    println!("{}", rt.host().inner_markup(app));

    click(&mut rt, "reset")?;
    println!("{}", rt.host().inner_markup(app));

    let stats = rt.stats();
    println!(
        "fOS UI v{}: {} passes, {} renders, {} messages",
        fos_ui::VERSION,
        stats.passes,
        stats.renders,
        stats.messages
    );
    Ok(())
}
