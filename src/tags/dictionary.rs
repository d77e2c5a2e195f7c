//! Static tag dictionary.
//!
//! Maps `(directory, id)` to a display name and the field type a writer
//! should use. The dictionary is read-only and only consulted for name
//! lookup, pointer recognition and CLI input; tags missing from it decode
//! and encode like any other.

use crate::error::TagError;
use crate::format::tiff::FieldType;

use super::directory::Directory;
use super::tag_ref::TagRef;

/// One dictionary entry.
#[derive(Debug, Clone, Copy)]
pub struct TagDef {
    pub name: &'static str,
    pub tag: TagRef,
}

/// Declares a module of `TagRef` constants and the matching entry table.
macro_rules! tag_table {
    (
        $(#[$meta:meta])*
        mod $module:ident => $table:ident in $directory:expr;
        $( $konst:ident = ($id:expr, $name:literal, $ty:ident), )*
    ) => {
        $(#[$meta])*
        pub mod $module {
            use super::{Directory, FieldType, TagRef};
            $(
                pub const $konst: TagRef = TagRef::new($id, $directory, FieldType::$ty);
            )*
        }

        static $table: &[TagDef] = &[
            $( TagDef { name: $name, tag: $module::$konst }, )*
        ];
    };
}

tag_table! {
    /// IFD0 tags.
    mod image => IMAGE_TAGS in Directory::Image;
    IMAGE_WIDTH = (0x0100, "ImageWidth", Long),
    IMAGE_LENGTH = (0x0101, "ImageLength", Long),
    BITS_PER_SAMPLE = (0x0102, "BitsPerSample", Short),
    COMPRESSION = (0x0103, "Compression", Short),
    PHOTOMETRIC_INTERPRETATION = (0x0106, "PhotometricInterpretation", Short),
    IMAGE_DESCRIPTION = (0x010E, "ImageDescription", Ascii),
    MAKE = (0x010F, "Make", Ascii),
    MODEL = (0x0110, "Model", Ascii),
    STRIP_OFFSETS = (0x0111, "StripOffsets", Long),
    ORIENTATION = (0x0112, "Orientation", Short),
    SAMPLES_PER_PIXEL = (0x0115, "SamplesPerPixel", Short),
    ROWS_PER_STRIP = (0x0116, "RowsPerStrip", Long),
    STRIP_BYTE_COUNTS = (0x0117, "StripByteCounts", Long),
    X_RESOLUTION = (0x011A, "XResolution", Rational),
    Y_RESOLUTION = (0x011B, "YResolution", Rational),
    PLANAR_CONFIGURATION = (0x011C, "PlanarConfiguration", Short),
    RESOLUTION_UNIT = (0x0128, "ResolutionUnit", Short),
    TRANSFER_FUNCTION = (0x012D, "TransferFunction", Short),
    SOFTWARE = (0x0131, "Software", Ascii),
    DATE_TIME = (0x0132, "DateTime", Ascii),
    ARTIST = (0x013B, "Artist", Ascii),
    WHITE_POINT = (0x013E, "WhitePoint", Rational),
    PRIMARY_CHROMATICITIES = (0x013F, "PrimaryChromaticities", Rational),
    Y_CB_CR_COEFFICIENTS = (0x0211, "YCbCrCoefficients", Rational),
    Y_CB_CR_SUB_SAMPLING = (0x0212, "YCbCrSubSampling", Short),
    Y_CB_CR_POSITIONING = (0x0213, "YCbCrPositioning", Short),
    REFERENCE_BLACK_WHITE = (0x0214, "ReferenceBlackWhite", Rational),
    COPYRIGHT = (0x8298, "Copyright", Ascii),
    EXIF_IFD_POINTER = (0x8769, "ExifTag", Long),
    GPS_IFD_POINTER = (0x8825, "GPSTag", Long),
}

tag_table! {
    /// Exif sub-IFD tags.
    mod exif => EXIF_TAGS in Directory::Exif;
    EXPOSURE_TIME = (0x829A, "ExposureTime", Rational),
    F_NUMBER = (0x829D, "FNumber", Rational),
    EXPOSURE_PROGRAM = (0x8822, "ExposureProgram", Short),
    SPECTRAL_SENSITIVITY = (0x8824, "SpectralSensitivity", Ascii),
    ISO_SPEED_RATINGS = (0x8827, "ISOSpeedRatings", Short),
    OECF = (0x8828, "OECF", Undefined),
    SENSITIVITY_TYPE = (0x8830, "SensitivityType", Short),
    STANDARD_OUTPUT_SENSITIVITY = (0x8831, "StandardOutputSensitivity", Long),
    RECOMMENDED_EXPOSURE_INDEX = (0x8832, "RecommendedExposureIndex", Long),
    ISO_SPEED = (0x8833, "ISOSpeed", Long),
    ISO_SPEED_LATITUDE_YYY = (0x8834, "ISOSpeedLatitudeyyy", Long),
    ISO_SPEED_LATITUDE_ZZZ = (0x8835, "ISOSpeedLatitudezzz", Long),
    EXIF_VERSION = (0x9000, "ExifVersion", Undefined),
    DATE_TIME_ORIGINAL = (0x9003, "DateTimeOriginal", Ascii),
    DATE_TIME_DIGITIZED = (0x9004, "DateTimeDigitized", Ascii),
    COMPONENTS_CONFIGURATION = (0x9101, "ComponentsConfiguration", Undefined),
    COMPRESSED_BITS_PER_PIXEL = (0x9102, "CompressedBitsPerPixel", Rational),
    SHUTTER_SPEED_VALUE = (0x9201, "ShutterSpeedValue", SRational),
    APERTURE_VALUE = (0x9202, "ApertureValue", Rational),
    BRIGHTNESS_VALUE = (0x9203, "BrightnessValue", SRational),
    EXPOSURE_BIAS_VALUE = (0x9204, "ExposureBiasValue", SRational),
    MAX_APERTURE_VALUE = (0x9205, "MaxApertureValue", Rational),
    SUBJECT_DISTANCE = (0x9206, "SubjectDistance", Rational),
    METERING_MODE = (0x9207, "MeteringMode", Short),
    LIGHT_SOURCE = (0x9208, "LightSource", Short),
    FLASH = (0x9209, "Flash", Short),
    FOCAL_LENGTH = (0x920A, "FocalLength", Rational),
    SUBJECT_AREA = (0x9214, "SubjectArea", Short),
    MAKER_NOTE = (0x927C, "MakerNote", Undefined),
    USER_COMMENT = (0x9286, "UserComment", Undefined),
    SUB_SEC_TIME = (0x9290, "SubSecTime", Ascii),
    SUB_SEC_TIME_ORIGINAL = (0x9291, "SubSecTimeOriginal", Ascii),
    SUB_SEC_TIME_DIGITIZED = (0x9292, "SubSecTimeDigitized", Ascii),
    FLASHPIX_VERSION = (0xA000, "FlashpixVersion", Undefined),
    COLOR_SPACE = (0xA001, "ColorSpace", Short),
    PIXEL_X_DIMENSION = (0xA002, "PixelXDimension", Short),
    PIXEL_Y_DIMENSION = (0xA003, "PixelYDimension", Short),
    RELATED_SOUND_FILE = (0xA004, "RelatedSoundFile", Ascii),
    INTEROPERABILITY_IFD_POINTER = (0xA005, "InteroperabilityTag", Long),
    FLASH_ENERGY = (0xA20B, "FlashEnergy", Rational),
    SPATIAL_FREQUENCY_RESPONSE = (0xA20C, "SpatialFrequencyResponse", Undefined),
    FOCAL_PLANE_X_RESOLUTION = (0xA20E, "FocalPlaneXResolution", Rational),
    FOCAL_PLANE_Y_RESOLUTION = (0xA20F, "FocalPlaneYResolution", Rational),
    FOCAL_PLANE_RESOLUTION_UNIT = (0xA210, "FocalPlaneResolutionUnit", Short),
    SUBJECT_LOCATION = (0xA214, "SubjectLocation", Short),
    EXPOSURE_INDEX = (0xA215, "ExposureIndex", Rational),
    SENSING_METHOD = (0xA217, "SensingMethod", Short),
    FILE_SOURCE = (0xA300, "FileSource", Undefined),
    SCENE_TYPE = (0xA301, "SceneType", Undefined),
    CFA_PATTERN = (0xA302, "CFAPattern", Undefined),
    CUSTOM_RENDERED = (0xA401, "CustomRendered", Short),
    EXPOSURE_MODE = (0xA402, "ExposureMode", Short),
    WHITE_BALANCE = (0xA403, "WhiteBalance", Short),
    DIGITAL_ZOOM_RATIO = (0xA404, "DigitalZoomRatio", Rational),
    SCENE_CAPTURE_TYPE = (0xA406, "SceneCaptureType", Short),
    GAIN_CONTROL = (0xA407, "GainControl", Short),
    CONTRAST = (0xA408, "Contrast", Short),
    SATURATION = (0xA409, "Saturation", Short),
    SHARPNESS = (0xA40A, "Sharpness", Short),
    DEVICE_SETTING_DESCRIPTION = (0xA40B, "DeviceSettingDescription", Undefined),
    SUBJECT_DISTANCE_RANGE = (0xA40C, "SubjectDistanceRange", Short),
    IMAGE_UNIQUE_ID = (0xA420, "ImageUniqueID", Ascii),
    CAMERA_OWNER_NAME = (0xA430, "CameraOwnerName", Ascii),
    BODY_SERIAL_NUMBER = (0xA431, "BodySerialNumber", Ascii),
    LENS_SPECIFICATION = (0xA432, "LensSpecification", Rational),
    LENS_MAKE = (0xA433, "LensMake", Ascii),
    LENS_MODEL = (0xA434, "LensModel", Ascii),
    LENS_SERIAL_NUMBER = (0xA435, "LensSerialNumber", Ascii),
}

tag_table! {
    /// GPS sub-IFD tags.
    mod gps => GPS_TAGS in Directory::GpsInfo;
    GPS_VERSION_ID = (0x0000, "GPSVersionID", Byte),
    GPS_LATITUDE_REF = (0x0001, "GPSLatitudeRef", Ascii),
    GPS_LATITUDE = (0x0002, "GPSLatitude", Rational),
    GPS_LONGITUDE_REF = (0x0003, "GPSLongitudeRef", Ascii),
    GPS_LONGITUDE = (0x0004, "GPSLongitude", Rational),
    GPS_ALTITUDE_REF = (0x0005, "GPSAltitudeRef", Byte),
    GPS_ALTITUDE = (0x0006, "GPSAltitude", Rational),
    GPS_TIME_STAMP = (0x0007, "GPSTimeStamp", Rational),
    GPS_SATELLITES = (0x0008, "GPSSatellites", Ascii),
    GPS_STATUS = (0x0009, "GPSStatus", Ascii),
    GPS_MEASURE_MODE = (0x000A, "GPSMeasureMode", Ascii),
    GPS_DOP = (0x000B, "GPSDOP", Rational),
    GPS_SPEED_REF = (0x000C, "GPSSpeedRef", Ascii),
    GPS_SPEED = (0x000D, "GPSSpeed", Rational),
    GPS_TRACK_REF = (0x000E, "GPSTrackRef", Ascii),
    GPS_TRACK = (0x000F, "GPSTrack", Rational),
    GPS_IMG_DIRECTION_REF = (0x0010, "GPSImgDirectionRef", Ascii),
    GPS_IMG_DIRECTION = (0x0011, "GPSImgDirection", Rational),
    GPS_MAP_DATUM = (0x0012, "GPSMapDatum", Ascii),
    GPS_DEST_LATITUDE_REF = (0x0013, "GPSDestLatitudeRef", Ascii),
    GPS_DEST_LATITUDE = (0x0014, "GPSDestLatitude", Rational),
    GPS_DEST_LONGITUDE_REF = (0x0015, "GPSDestLongitudeRef", Ascii),
    GPS_DEST_LONGITUDE = (0x0016, "GPSDestLongitude", Rational),
    GPS_DEST_BEARING_REF = (0x0017, "GPSDestBearingRef", Ascii),
    GPS_DEST_BEARING = (0x0018, "GPSDestBearing", Rational),
    GPS_DEST_DISTANCE_REF = (0x0019, "GPSDestDistanceRef", Ascii),
    GPS_DEST_DISTANCE = (0x001A, "GPSDestDistance", Rational),
    GPS_PROCESSING_METHOD = (0x001B, "GPSProcessingMethod", Undefined),
    GPS_AREA_INFORMATION = (0x001C, "GPSAreaInformation", Undefined),
    GPS_DATE_STAMP = (0x001D, "GPSDateStamp", Ascii),
    GPS_DIFFERENTIAL = (0x001E, "GPSDifferential", Short),
}

tag_table! {
    /// Interoperability sub-IFD tags.
    mod interop => INTEROP_TAGS in Directory::Interoperability;
    INTEROPERABILITY_INDEX = (0x0001, "InteroperabilityIndex", Ascii),
    INTEROPERABILITY_VERSION = (0x0002, "InteroperabilityVersion", Undefined),
    RELATED_IMAGE_FILE_FORMAT = (0x1000, "RelatedImageFileFormat", Ascii),
    RELATED_IMAGE_WIDTH = (0x1001, "RelatedImageWidth", Short),
    RELATED_IMAGE_LENGTH = (0x1002, "RelatedImageLength", Short),
}

tag_table! {
    /// IFD1 tags describing the embedded thumbnail.
    mod thumbnail => THUMBNAIL_TAGS in Directory::Thumbnail;
    IMAGE_WIDTH = (0x0100, "ImageWidth", Long),
    IMAGE_LENGTH = (0x0101, "ImageLength", Long),
    BITS_PER_SAMPLE = (0x0102, "BitsPerSample", Short),
    COMPRESSION = (0x0103, "Compression", Short),
    PHOTOMETRIC_INTERPRETATION = (0x0106, "PhotometricInterpretation", Short),
    ORIENTATION = (0x0112, "Orientation", Short),
    SAMPLES_PER_PIXEL = (0x0115, "SamplesPerPixel", Short),
    X_RESOLUTION = (0x011A, "XResolution", Rational),
    Y_RESOLUTION = (0x011B, "YResolution", Rational),
    RESOLUTION_UNIT = (0x0128, "ResolutionUnit", Short),
    JPEG_INTERCHANGE_FORMAT = (0x0201, "JPEGInterchangeFormat", Long),
    JPEG_INTERCHANGE_FORMAT_LENGTH = (0x0202, "JPEGInterchangeFormatLength", Long),
    Y_CB_CR_POSITIONING = (0x0213, "YCbCrPositioning", Short),
}

// =============================================================================
// Lookup
// =============================================================================

/// All entries of one directory.
pub fn definitions(directory: Directory) -> &'static [TagDef] {
    match directory {
        Directory::Image => IMAGE_TAGS,
        Directory::Exif => EXIF_TAGS,
        Directory::Interoperability => INTEROP_TAGS,
        Directory::GpsInfo => GPS_TAGS,
        Directory::Thumbnail => THUMBNAIL_TAGS,
    }
}

pub fn lookup(directory: Directory, id: u16) -> Option<&'static TagDef> {
    definitions(directory).iter().find(|def| def.tag.id == id)
}

/// Find a tag by name.
///
/// Accepts a bare name (`"Make"`), searched in directory order, or a
/// qualified one (`"Exif.FNumber"`, `"Thumbnail.Compression"`). Matching is
/// case-insensitive.
pub fn lookup_name(name: &str) -> Option<&'static TagDef> {
    let find_in = |directory: Directory, name: &str| {
        definitions(directory)
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
    };

    if let Some((prefix, rest)) = name.split_once('.') {
        if let Some(directory) = Directory::from_name(prefix) {
            return find_in(directory, rest);
        }
    }

    Directory::ALL
        .into_iter()
        .find_map(|directory| find_in(directory, name))
}

/// Resolve a name to a reference, or fail with `UnknownName`.
pub fn resolve(name: &str) -> Result<TagRef, TagError> {
    lookup_name(name)
        .map(|def| def.tag)
        .ok_or_else(|| TagError::UnknownName(name.to_string()))
}

/// Directory reached through pointer tag `id` stored in `directory`.
pub fn pointer_target(directory: Directory, id: u16) -> Option<Directory> {
    match (directory, id) {
        (Directory::Image, id) if id == image::EXIF_IFD_POINTER.id => Some(Directory::Exif),
        (Directory::Image, id) if id == image::GPS_IFD_POINTER.id => Some(Directory::GpsInfo),
        (Directory::Exif, id) if id == exif::INTEROPERABILITY_IFD_POINTER.id => {
            Some(Directory::Interoperability)
        }
        _ => None,
    }
}

/// Pointer tag, held in the parent directory, that leads to `directory`.
pub fn pointer_to(directory: Directory) -> Option<TagRef> {
    match directory {
        Directory::Exif => Some(image::EXIF_IFD_POINTER),
        Directory::GpsInfo => Some(image::GPS_IFD_POINTER),
        Directory::Interoperability => Some(exif::INTEROPERABILITY_IFD_POINTER),
        Directory::Image | Directory::Thumbnail => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
