use crate::account::require_token;
use crate::auth::AuthConfig;
use crate::client::{ApiClient, BoxInfo};
use crate::grid::Grid;
use crate::logger::Logger;
use anyhow::Result;

/// What to do to the grid before saving it back.
pub enum Edit {
    Toggle(Vec<i64>),
    Extend { from: i64, to: i64 },
    Add(u32),
}

pub async fn show(client: &ApiClient) -> Result<()> {
    let auth = AuthConfig::load()?;
    let token = require_token(&auth)?;

    let grid = Grid::from(client.box_info(token).await?);
    print_grid(&grid);
    Ok(())
}

/// Load, apply `edit`, save, print. Always a full overwrite of the stored state.
pub async fn edit(client: &ApiClient, edit: Edit) -> Result<()> {
    let auth = AuthConfig::load()?;
    let token = require_token(&auth)?;

    let mut grid = Grid::from(client.box_info(token).await?);
    match edit {
        Edit::Toggle(indices) => {
            for i in indices {
                grid.toggle(i);
            }
        }
        Edit::Extend { from, to } => grid.extend(from, to),
        Edit::Add(0) => {
            Logger::warn("Nothing to add.");
            return Ok(());
        }
        Edit::Add(count) => grid.add_squares(count),
    }

    let saved = Grid::from(client.save_box_info(token, &BoxInfo::from(&grid)).await?);
    Logger::success("Saved.");
    print_grid(&saved);
    Ok(())
}

pub async fn reset(client: &ApiClient) -> Result<()> {
    let auth = AuthConfig::load()?;
    let token = require_token(&auth)?;

    let grid = Grid::from(client.reset_boxes(token).await?);
    Logger::success("Grid reset.");
    print_grid(&grid);
    Ok(())
}

fn print_grid(grid: &Grid) {
    Logger::header(format!(
        "{} boxes, {} selected",
        grid.total_squares,
        grid.selected.len()
    ));

    let cell_width = grid.total_squares.to_string().len() + 2;
    let rows = grid.render(Logger::cells_per_row(cell_width), |label, selected| {
        if selected {
            Logger::selected(label)
        } else {
            Logger::dim(label)
        }
    });
    for row in rows {
        println!("{}", row);
    }
}
