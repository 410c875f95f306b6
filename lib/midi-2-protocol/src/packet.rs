// =============================================================================
// Packet
// =============================================================================

//! Bit-level views over UMP packet storage.
//!
//! A [`Packet`] is anything backed by a fixed number of 32-bit words whose
//! bits can be addressed as a single big-endian, MSB-first slice. [`GetBitSlice`]
//! is the common denominator that both whole packets and raw bit slices
//! satisfy, which lets [`TryReadField`]/[`WriteField`] read and write fields
//! through either one.

use bitvec::{
    order::Msb0,
    slice::BitSlice,
};

use crate::{
    field::{
        TryReadFromPacket,
        WriteToPacket,
    },
    Error,
};

// -----------------------------------------------------------------------------

// Traits

// Packet

pub trait Packet {
    fn get(&self) -> &BitSlice<u32, Msb0>;
    fn get_mut(&mut self) -> &mut BitSlice<u32, Msb0>;

    #[must_use]
    fn reset(self) -> Self
    where
        Self: Sized;
}

// GetBitSlice

pub trait GetBitSlice {
    fn get_bit_slice(&self) -> &BitSlice<u32, Msb0>;
    fn get_bit_slice_mut(&mut self) -> &mut BitSlice<u32, Msb0>;
}

impl<T> GetBitSlice for T
where
    T: Packet,
{
    fn get_bit_slice(&self) -> &BitSlice<u32, Msb0> {
        self.get()
    }

    fn get_bit_slice_mut(&mut self) -> &mut BitSlice<u32, Msb0> {
        self.get_mut()
    }
}

impl GetBitSlice for BitSlice<u32, Msb0> {
    fn get_bit_slice(&self) -> &BitSlice<u32, Msb0> {
        self
    }

    fn get_bit_slice_mut(&mut self) -> &mut BitSlice<u32, Msb0> {
        self
    }
}

// TryReadField

pub trait TryReadField {
    fn try_read_field<F>(&self) -> Result<F, Error>
    where
        F: TryReadFromPacket;
}

impl<T> TryReadField for T
where
    T: GetBitSlice,
{
    fn try_read_field<F>(&self) -> Result<F, Error>
    where
        F: TryReadFromPacket,
    {
        F::try_read_from_packet(self)
    }
}

// WriteField

pub trait WriteField: Sized {
    #[must_use]
    fn write_field<F>(self, field: F) -> Self
    where
        F: WriteToPacket;
}

impl<T> WriteField for T
where
    T: GetBitSlice,
{
    fn write_field<F>(self, field: F) -> Self
    where
        F: WriteToPacket,
    {
        field.write_to_packet(self)
    }
}
