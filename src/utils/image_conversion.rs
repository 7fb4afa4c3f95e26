//! Image conversion utilities for OpenCV Mat and ndarray interoperability.

use crate::utils::safe_cast::i32_to_usize;
use crate::Result;
use ndarray::{Array3, Array4, Axis};
use opencv::core::{Mat, MatTraitConst, Size, Vec3b};
use opencv::imgproc::{self, InterpolationFlags};

/// Convert an 8-bit, 3-channel OpenCV Mat to an ndarray Array3<u8>
///
/// # Arguments
/// * `mat` - OpenCV Mat with shape (height, width, 3) and CV_8U depth
///
/// # Returns
/// * `Array3<u8>` with shape (height, width, 3)
///
/// # Errors
/// * Returns error if Mat dimensions or channel count are invalid
/// * Returns error if Mat data cannot be accessed
pub fn mat_to_array3_u8(mat: &Mat) -> Result<Array3<u8>> {
    let rows = mat.rows();
    let cols = mat.cols();
    let channels = mat.channels();

    if rows <= 0 || cols <= 0 || channels != 3 {
        return Err(crate::error::Error::InvalidInput(format!(
            "Invalid Mat dimensions: {}x{}x{}",
            rows, cols, channels
        )));
    }

    let (height, width) = (i32_to_usize(rows)?, i32_to_usize(cols)?);
    let mut data = Vec::with_capacity(height * width * 3);

    for row in 0..rows {
        for col in 0..cols {
            let pixel = mat.at_2d::<Vec3b>(row, col)?;
            data.extend_from_slice(&pixel.0);
        }
    }

    Array3::from_shape_vec((height, width, 3), data)
        .map_err(|e| crate::error::Error::InvalidInput(format!("Failed to create array from Mat: {}", e)))
}

/// Resize a BGR frame to `size`x`size` and convert it to RGB
///
/// # Errors
/// * Returns error if the OpenCV resize or colour conversion fails
pub fn resize_to_rgb(image: &Mat, size: i32) -> Result<Mat> {
    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut rgb_image = Mat::default();
    imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;
    Ok(rgb_image)
}

/// Build a single-image NHWC batch with pixel values in `[0, 255]`
///
/// # Errors
/// * Returns error if the frame cannot be resized or read
pub fn nhwc_batch_i32(image: &Mat, size: i32) -> Result<Array4<i32>> {
    let rgb = mat_to_array3_u8(&resize_to_rgb(image, size)?)?;
    Ok(rgb.mapv(i32::from).insert_axis(Axis(0)))
}

/// Build a single-image NHWC batch of `f32` with pixel values in `[0, 255]`
///
/// # Errors
/// * Returns error if the frame cannot be resized or read
pub fn nhwc_batch_f32(image: &Mat, size: i32) -> Result<Array4<f32>> {
    let rgb = mat_to_array3_u8(&resize_to_rgb(image, size)?)?;
    Ok(rgb.mapv(f32::from).insert_axis(Axis(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC1, CV_8UC3};

    #[test]
    fn test_mat_to_array3_u8() {
        let mat = Mat::new_rows_cols_with_default(2, 3, CV_8UC3, Scalar::new(10.0, 20.0, 30.0, 0.0)).unwrap();

        let array = mat_to_array3_u8(&mat).unwrap();
        assert_eq!(array.shape(), &[2, 3, 3]);
        assert_eq!(array[[0, 0, 0]], 10);
        assert_eq!(array[[0, 0, 1]], 20);
        assert_eq!(array[[1, 2, 2]], 30);
    }

    #[test]
    fn test_mat_to_array3_u8_rejects_gray() {
        let mat = Mat::new_rows_cols_with_default(2, 3, CV_8UC1, Scalar::all(0.0)).unwrap();
        assert!(mat_to_array3_u8(&mat).is_err());
        assert!(mat_to_array3_u8(&Mat::default()).is_err());
    }

    #[test]
    fn test_nhwc_batch_swaps_channels() {
        // Pure blue in BGR
        let mat = Mat::new_rows_cols_with_default(50, 80, CV_8UC3, Scalar::new(255.0, 0.0, 0.0, 0.0)).unwrap();

        let batch = nhwc_batch_i32(&mat, 16).unwrap();
        assert_eq!(batch.shape(), &[1, 16, 16, 3]);
        assert_eq!(batch[[0, 5, 5, 0]], 0);
        assert_eq!(batch[[0, 5, 5, 2]], 255);
    }

    #[test]
    fn test_nhwc_batch_f32_range() {
        let mat = Mat::new_rows_cols_with_default(20, 20, CV_8UC3, Scalar::new(0.0, 128.0, 64.0, 0.0)).unwrap();

        let batch = nhwc_batch_f32(&mat, 8).unwrap();
        assert_eq!(batch.shape(), &[1, 8, 8, 3]);
        assert_eq!(batch[[0, 0, 0, 0]], 64.0);
        assert_eq!(batch[[0, 7, 7, 1]], 128.0);
    }
}
