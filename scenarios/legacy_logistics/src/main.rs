use latency_grader_runner::prelude::*;

fn main() -> GraderResult<()> {
    let cli = init();

    run(legacy_logistics::benchmark(cli))?;

    Ok(())
}
