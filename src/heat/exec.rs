use super::{heatmap_for, output_heatmap, render_svg, HeatmapOptions};
use crate::checkin;
use crate::cli::CommonArgs;
use anyhow::Context;

pub fn exec(common: &CommonArgs, svg: bool, options: HeatmapOptions) -> anyhow::Result<()> {
    let source = common.open_source()?;
    let report = checkin::run(source.as_ref(), &common.engine_config())
        .context("Failed to read commit history")?;

    let grid = heatmap_for(&report, &options, common.today());

    if svg {
        print!("{}", render_svg(&grid).context("Failed to render heatmap")?);
    } else {
        output_heatmap(&grid)?;
    }

    Ok(())
}
