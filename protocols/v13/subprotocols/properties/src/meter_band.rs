//! Meter bands. Each band starts with `type:u16, len:u16, rate:u32, burst_size:u32`.

use alloc::vec::Vec;

use binary_ofp::{
    impl_variant, peek_tlv_header, read_tlv_header, write_tlv_header, Category, CategoryId,
    Decoder, Encoder, Error, Member, OrderedList, SubHeader, Validator, WireValue,
};
use const_ofp::*;

pub struct MeterBands;

impl Category for MeterBands {
    type Tag = u16;
    const ID: CategoryId = CategoryId::MeterBand;
    const HEADER_LEN: usize = METER_BAND_HEADER_SIZE;

    fn peek_header(src: &Decoder<'_>) -> Result<SubHeader<u16>, Error> {
        peek_tlv_header(src)
    }
}

fn write_band_header(dst: &mut Vec<u8>, tag: u16, len: u16, rate: u32, burst_size: u32) {
    write_tlv_header(dst, tag, len);
    dst.put_u32(rate);
    dst.put_u32(burst_size);
}

fn check_rate(rate: u32) -> Result<(), Error> {
    if rate == 0 {
        return Err(Error::invalid(METER_MOD_FAILED_BAD_RATE, "band rate is zero"));
    }
    Ok(())
}

/// Drops packets above `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drop {
    pub rate: u32,
    pub burst_size: u32,
    pub pad: [u8; 4],
}

impl Drop {
    pub fn new(rate: u32, burst_size: u32) -> Self {
        Self {
            rate,
            burst_size,
            pad: [0; 4],
        }
    }
}

impl Member for Drop {
    type Category = MeterBands;
    const TAG: u16 = METER_BAND_TYPE_DROP;
}

impl WireValue for Drop {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        16
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_band_header(dst, Self::TAG, 16, self.rate, self.burst_size);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            rate: src.read_u32()?,
            burst_size: src.read_u32()?,
            pad: src.read_array()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        check_rate(self.rate)
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.rate == other.rate && self.burst_size == other.burst_size
    }
}

/// Raises the drop precedence of the DSCP field by `prec_level` above `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DscpRemark {
    pub rate: u32,
    pub burst_size: u32,
    pub prec_level: u8,
    pub pad: [u8; 3],
}

impl DscpRemark {
    pub fn new(rate: u32, burst_size: u32, prec_level: u8) -> Self {
        Self {
            rate,
            burst_size,
            prec_level,
            pad: [0; 3],
        }
    }
}

impl Member for DscpRemark {
    type Category = MeterBands;
    const TAG: u16 = METER_BAND_TYPE_DSCP_REMARK;
}

impl WireValue for DscpRemark {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = true;

    fn wire_length(&self) -> usize {
        16
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        write_band_header(dst, Self::TAG, 16, self.rate, self.burst_size);
        dst.put_u8(self.prec_level);
        dst.put_slice(&self.pad);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        read_tlv_header::<Self>(src)?;
        Ok(Self {
            rate: src.read_u32()?,
            burst_size: src.read_u32()?,
            prec_level: src.read_u8()?,
            pad: src.read_array()?,
        })
    }

    fn validate<V: Validator>(&self, _validator: &V) -> Result<(), Error> {
        check_rate(self.rate)?;
        if self.prec_level > IP_DSCP_MAX {
            return Err(Error::invalid(
                METER_MOD_FAILED_BAD_BAND_VALUE,
                "precedence level does not fit in 6 bits",
            ));
        }
        Ok(())
    }

    fn equivalent(&self, other: &Self) -> bool {
        self.rate == other.rate
            && self.burst_size == other.burst_size
            && self.prec_level == other.prec_level
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experimenter {
    pub rate: u32,
    pub burst_size: u32,
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl Experimenter {
    pub fn new(rate: u32, burst_size: u32, experimenter: u32, data: &[u8]) -> Self {
        Self {
            rate,
            burst_size,
            experimenter,
            data: data.to_vec(),
        }
    }
}

impl Member for Experimenter {
    type Category = MeterBands;
    const TAG: u16 = METER_BAND_TYPE_EXPERIMENTER;
}

impl WireValue for Experimenter {
    const MIN_LENGTH: u16 = 16;
    const FIXED_LENGTH: bool = false;

    fn wire_length(&self) -> usize {
        16 + self.data.len()
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        let len = self.wire_length() as u16;
        write_band_header(dst, Self::TAG, len, self.rate, self.burst_size);
        dst.put_u32(self.experimenter);
        dst.put_slice(&self.data);
    }

    fn decode(src: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = read_tlv_header::<Self>(src)? as usize;
        Ok(Self {
            rate: src.read_u32()?,
            burst_size: src.read_u32()?,
            experimenter: src.read_u32()?,
            data: src.read_bytes(len - 16)?.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyMeterBand {
    Drop(Drop),
    DscpRemark(DscpRemark),
    Experimenter(Experimenter),
}

impl_variant!(AnyMeterBand: MeterBands {
    Drop(Drop),
    DscpRemark(DscpRemark),
    Experimenter(Experimenter),
});

impl AnyMeterBand {
    pub fn rate(&self) -> u32 {
        match self {
            AnyMeterBand::Drop(b) => b.rate,
            AnyMeterBand::DscpRemark(b) => b.rate,
            AnyMeterBand::Experimenter(b) => b.rate,
        }
    }
}

pub type MeterBandList = OrderedList<AnyMeterBand>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use binary_ofp::{ErrorCode, ErrorType, Recursive, Shallow, Variant};

    #[test]
    fn test_dscp_remark_layout() {
        let band = AnyMeterBand::from(DscpRemark::new(1000, 10, 2));
        assert_eq!(
            band.to_bytes(),
            vec![0, 2, 0, 16, 0, 0, 0x03, 0xe8, 0, 0, 0, 10, 2, 0, 0, 0]
        );
        assert_eq!(band.rate(), 1000);
        assert_eq!(AnyMeterBand::from_bytes(&band.to_bytes()), Ok(band));
    }

    #[test]
    fn test_band_value_out_of_range() {
        let band = AnyMeterBand::from(DscpRemark::new(1, 0, 64));
        assert_eq!(
            band.validate(&Shallow).unwrap_err().code(),
            ErrorCode::protocol(ErrorType::MeterModFailed, METER_MOD_FAILED_BAD_BAND_VALUE)
        );
        assert!(AnyMeterBand::from(DscpRemark::new(1, 0, 63))
            .validate(&Recursive)
            .is_ok());
        assert_eq!(
            AnyMeterBand::from(Drop::new(0, 0))
                .validate(&Shallow)
                .unwrap_err()
                .code(),
            ErrorCode::protocol(ErrorType::MeterModFailed, METER_MOD_FAILED_BAD_RATE)
        );
    }

    #[test]
    fn test_malformed_bands_are_bad_band() {
        let bad_band = ErrorCode::protocol(ErrorType::MeterModFailed, METER_MOD_FAILED_BAD_BAND);
        let unknown = [0, 3, 0, 16, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            MeterBandList::from_bytes(&unknown).unwrap_err().code(),
            bad_band
        );
        let long_drop = [0, 1, 0, 24, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            MeterBandList::from_bytes(&long_drop).unwrap_err().code(),
            bad_band
        );
    }

    #[test]
    fn test_experimenter_band() {
        let band = AnyMeterBand::from(Experimenter::new(5, 6, 0x00ab_cdef, &[9; 8]));
        assert_eq!(band.length(), 24);
        let list: MeterBandList = vec![band, AnyMeterBand::from(Drop::new(1, 1))].into();
        let bytes = list.to_bytes();
        assert_eq!(bytes.len(), 40);
        assert_eq!(MeterBandList::from_bytes(&bytes), Ok(list));
    }

    #[test]
    fn test_band_longer_than_length_field() {
        let band = AnyMeterBand::from(Experimenter::new(1, 0, 0xabcd, &vec![0; 70_000]));
        assert_eq!(
            band.validate(&Shallow).unwrap_err().code(),
            ErrorCode::protocol(ErrorType::MeterModFailed, METER_MOD_FAILED_BAD_BAND)
        );
    }
}
