// =============================================================================
// Bit Resolution Scaling
// =============================================================================

//! Lossless-as-possible up/down scaling between differing bit resolutions,
//! used whenever a value crosses between the MIDI 1.0 Channel Voice (7/14
//! bit) and MIDI 2.x Channel Voice (7/16/32 bit) worlds.
//!
//! Downscaling (`SOURCE_BITS >= DEST_BITS`) is a plain truncating right
//! shift: the extra low bits carried no information a narrower field could
//! hold anyway.
//!
//! Upscaling (`SOURCE_BITS < DEST_BITS`) cannot just zero-fill the new low
//! bits, or the loudest value representable in the source resolution would
//! never reach the destination's maximum. Instead the source value is
//! left-justified into the destination width and the gap is back-filled by
//! repeating the source's own most-significant bits, so that the all-ones
//! source value maps to the all-ones destination value.

/// Rescales `value`, a `SOURCE_BITS`-wide quantity, to `DEST_BITS`.
///
/// `value` is assumed to already fit within `SOURCE_BITS`; any higher bits
/// are ignored by the shifts below rather than rejected, matching the
/// "min-center-max" scaling used throughout the wire format this mirrors.
#[must_use]
pub const fn mcm_scale<const SOURCE_BITS: u32, const DEST_BITS: u32>(value: u32) -> u32 {
    if SOURCE_BITS >= DEST_BITS {
        return value >> (SOURCE_BITS - DEST_BITS);
    }

    if value == 0 {
        return 0;
    }

    let scale_bits = DEST_BITS - SOURCE_BITS;
    let center = 1u32 << (SOURCE_BITS - 1);
    let bit_shifted_value = value << scale_bits;

    if value <= center {
        return bit_shifted_value;
    }

    // Repeat the source's fractional bits (everything below the center bit)
    // into the new low bits, so the scaled value climbs smoothly from
    // `center` to the destination's maximum rather than jumping straight
    // there.
    let repeat_bits = SOURCE_BITS - 1;
    let mut repeat_value = value & ((1u32 << repeat_bits) - 1);
    repeat_value = if scale_bits > repeat_bits {
        repeat_value << (scale_bits - repeat_bits)
    } else {
        repeat_value >> (repeat_bits - scale_bits)
    };

    let mut result = bit_shifted_value;
    while repeat_value != 0 {
        result |= repeat_value;
        repeat_value >>= repeat_bits;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::mcm_scale;

    #[test]
    fn downscale_is_a_truncating_shift() {
        assert_eq!(mcm_scale::<16, 7>(0xaeba), 0x57);
        assert_eq!(mcm_scale::<32, 7>(0xffff_ffff), 0x7f);
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(mcm_scale::<7, 32>(0), 0);
        assert_eq!(mcm_scale::<7, 14>(0), 0);
    }

    #[test]
    fn center_value_maps_to_destination_center() {
        assert_eq!(mcm_scale::<7, 32>(0x40), 0x8000_0000);
    }

    #[test]
    fn maximum_value_maps_to_destination_maximum() {
        assert_eq!(mcm_scale::<7, 32>(0x7f), 0xffff_ffff);
        assert_eq!(mcm_scale::<7, 16>(0x7f), 0xffff);
        assert_eq!(mcm_scale::<14, 32>(0x3fff), 0xffff_ffff);
    }

    #[test]
    fn round_trip_through_downscale_then_upscale_preserves_extremes() {
        let down = mcm_scale::<32, 7>(0xffff_ffff);
        assert_eq!(mcm_scale::<7, 32>(down), 0xffff_ffff);

        let down = mcm_scale::<32, 7>(0);
        assert_eq!(mcm_scale::<7, 32>(down), 0);
    }
}
