use ndarray::Array4;
use opencv::core::{Mat, MatTraitConst, Size, Vec3b, Vector, VectorToVec};
use opencv::imgcodecs::{imdecode, imencode, IMREAD_COLOR};
use opencv::imgproc;
use opencv::imgproc::resize;

use crate::error::{Error, Result};

/// decode_image decodes raw uploaded bytes into a BGR pixel buffer.
///
/// The buffer stays in OpenCV's native BGR channel order; the renderer
/// reorders hex colors to match, exactly like the original capture path.
///
/// # Arguments
/// * `im_bytes` - raw compressed image bytes
///
/// # Returns
/// * `Result<Mat>`
pub fn decode_image(im_bytes: &[u8]) -> Result<Mat> {
    let buf = Mat::from_slice(im_bytes).map_err(|e| Error::Decode(e.to_string()))?;
    let img = imdecode(&buf, IMREAD_COLOR).map_err(|e| Error::Decode(e.to_string()))?;

    // imdecode signals unrecognized content with an empty Mat, not an error
    if img.rows() == 0 || img.cols() == 0 {
        return Err(Error::decode("input bytes are not a valid image"));
    }
    Ok(img)
}

/// encode_image compresses a pixel buffer back to bytes in the given
/// format (e.g. ".jpg", ".png").
pub fn encode_image(img: &Mat, ext: &str) -> Result<Vec<u8>> {
    let mut buf = Vector::<u8>::new();
    let ok = imencode(ext, img, &mut buf, &Vector::new())?;
    if !ok {
        return Err(Error::Encode(format!("imencode rejected format {ext}")));
    }
    Ok(buf.to_vec())
}

/// to_input_tensor resizes a copy of the image to the classifier input
/// shape and scales pixel values, producing a batch-of-one NHWC tensor.
/// The input Mat is left untouched.
///
/// # Arguments
/// * `img` - BGR pixel buffer
/// * `imsize` - (width, height) expected by the model
/// * `scale` - per-channel pixel scale, typically 1/255
///
/// # Returns
/// * `Result<Array4<f32>>`
pub fn to_input_tensor(img: &Mat, imsize: (i32, i32), scale: f32) -> Result<Array4<f32>> {
    let (width, height) = imsize;
    let mut resized = Mat::default();
    resize(
        img,
        &mut resized,
        Size::new(width, height),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
    for y in 0..height as usize {
        for x in 0..width as usize {
            let pixel = resized.at_2d::<Vec3b>(y as i32, x as i32)?;
            for c in 0..3 {
                tensor[[0, y, x, c]] = pixel[c] as f32 * scale;
            }
        }
    }
    Ok(tensor)
}
