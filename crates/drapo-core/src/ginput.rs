//! Blocking helpers collecting positions from the user.
//!
//! Each helper creates an object, pumps the canvas event loop until the
//! object is deleted (or the timeout elapses) and returns what it recorded.

use kurbo::Point;

use crate::canvas::Canvas;
use crate::error::DrapoResult;
use crate::figure::{BlockEnd, Figure};
use crate::objects::InteractiveObject;
use crate::options::{GinputOptions, LineOptions, RinputOptions, timeout_duration};
use crate::shapes::{ShapeId, ShapeKind};

/// Wait for the object and take it back from the figure.
fn wait_for<C: Canvas>(
    figure: &mut Figure<C>,
    id: ShapeId,
    timeout_secs: f64,
) -> DrapoResult<Option<InteractiveObject>> {
    let end = figure.block_on(id, timeout_duration(timeout_secs))?;
    Ok(match end {
        BlockEnd::Deleted(object) => Some(*object),
        BlockEnd::TimedOut | BlockEnd::LoopEnded => figure.delete(id),
    })
}

/// Collect clicks with a cursor and return them in data coordinates, in
/// click order.
///
/// Add button clicks (or `a`) record a point, remove button clicks (or `z`)
/// drop the last one, the stop button or `enter` ends early. Marks are
/// removed before returning.
pub fn ginput<C: Canvas>(figure: &mut Figure<C>, options: &GinputOptions) -> DrapoResult<Vec<Point>> {
    let id = figure.add_cursor(options.cursor_options())?;
    let Some(mut cursor) = wait_for(figure, id, options.timeout)?.and_then(|o| o.into_cursor())
    else {
        return Ok(Vec::new());
    };

    let (canvas, state) = figure.parts_mut(ShapeKind::Cursor);
    cursor.erase_marks(canvas, state);
    log::info!("ginput: {} point(s) collected", cursor.click_count());
    Ok(cursor.click_data().to_vec())
}

/// Let the user place a line and validate it with `enter`.
///
/// Returns the endpoints in data coordinates, or None if the line was
/// deleted another way or the wait ended first.
pub fn linput<C: Canvas>(figure: &mut Figure<C>, options: &LineOptions) -> DrapoResult<Option<[Point; 2]>> {
    let id = figure.add_line(options.clone().with_blocking(false))?;
    let line = wait_for(figure, id, options.timeout)?.and_then(|o| o.into_line());
    let recorded = line.as_ref().and_then(|l| l.recorded());
    if recorded.is_none() {
        log::warn!("line deleted before its position was validated, no data recorded");
    }
    Ok(recorded)
}

/// Let the user place a rectangle and validate it with `enter`.
///
/// Returns `(xmin, ymin, width, height)` in data coordinates, or None if the
/// rectangle was deleted another way or the wait ended first.
pub fn rinput<C: Canvas>(
    figure: &mut Figure<C>,
    options: &RinputOptions,
) -> DrapoResult<Option<(f64, f64, f64, f64)>> {
    let id = figure.add_rect(options.clone().with_blocking(false))?;
    let rect = wait_for(figure, id, options.timeout)?.and_then(|o| o.into_rect());
    let recorded = rect.as_ref().and_then(|r| r.recorded());
    if recorded.is_none() {
        log::warn!("rectangle deleted before its position was validated, no data recorded");
    }
    Ok(recorded)
}
