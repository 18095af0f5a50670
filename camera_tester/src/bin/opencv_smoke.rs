// Checks that the OpenCV bindings link and run, without opening a camera.

use opencv::{
    core::{self, Mat},
    prelude::*,
};

fn main() -> opencv::Result<()> {
    let eye = Mat::eye(3, 3, core::CV_8UC1)?.to_mat()?;

    let mut rows = Vec::with_capacity(eye.rows() as usize);
    for row in 0..eye.rows() {
        let values = (0..eye.cols())
            .map(|col| eye.at_2d::<u8>(row, col).map(|v| v.to_string()))
            .collect::<opencv::Result<Vec<_>>>()?;
        rows.push(values.join(", "));
    }
    println!("mat = [{}]", rows.join(";\n "));
    Ok(())
}
