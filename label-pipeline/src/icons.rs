//! Static iconography
//!
//! Pre-packed `^GFA` bitmaps for the header logo, the conformity mark and the
//! info glyph. Authored once with the image converter and never regenerated.

use std::sync::LazyLock;

use zpl_printer::{EncodingError, PackedBitmap};

use crate::record::Variant;

/// Header logo, conformity mark and info glyph for one label family
#[derive(Debug, Clone)]
pub struct IconSet {
    pub head: PackedBitmap,
    pub mark: PackedBitmap,
    pub info: PackedBitmap,
}

impl IconSet {
    fn parse(head: &str, mark: &str, info: &str) -> Result<Self, EncodingError> {
        Ok(Self {
            head: PackedBitmap::parse_gfa(head)?,
            mark: PackedBitmap::parse_gfa(mark)?,
            info: PackedBitmap::parse_gfa(info)?,
        })
    }
}

/// Header logo, C Basic and camera head labels
const CLASSIC_HEAD: &str = "^GFA,234,234,6,\
    0047FFF10000003FFFFE0000027FFFFF200005FFC1FFD0000BFC7F1FE80017F3C1E7F4000FCC0019\
    F8002FB00006FA001F6000037C007E800000BF003D0000005E00FE0000003F807A0000002F00FC00\
    00001F80F0001C000780F80022000F80F0003E000780F0007F000780E0007F000380E0007F000380\
    E0007F000380F0007F000780F0003E000780F80022000F80F0001C000780FC0000001F807A000000\
    2F00FE0000003F803D0000005E007E800000BF001F6000037C002FB00006FA000FCC0019F80017F3\
    C1E7F4000BFC7F1FE80005FFC1FFD000027FFFFF2000003FFFFE00000047FFF10000";

/// Conformity mark, C Basic and camera head labels
const CLASSIC_MARK: &str = "^GFA,234,234,6,\
    00BFA0005F8002FFA0017F8005FFA000FF8003FFA003FF8037FFA017FF802FFFA017FF805FFF802F\
    FC003FE8005FE000BFD0005FD0007FA000BFA0007F4000BF4000FE80017F4000FE80017E4000FD00\
    017E8000FD00007E8000FD00007D8000FD0000FFFE00FA0002FFFE80FA0002FFFE80FA0002FFFE80\
    FA0002FFFE80FA0002FFFE80FB0000FFFE00FD00007E8000FD00007E8000FD00017E8000FE80017F\
    4000FE80017F40007F4000BFA0007FA000BFD000BFD0005FE8003FE8005FF4005FFF802FFF802FFF\
    A017FF8037FFA017FF8003FFA003FF8005FFA000FF8002FFA0017F8000BFA0005F80";

/// Info glyph, C Basic and camera head labels
const CLASSIC_INFO: &str = "^GFA,234,234,6,\
    C8003F800D80E60C000F13807973BFF0EF80BC8FFFFF1F004F7FFFFFFC8037FFFFFFFB0009FFFFFF\
    E40006F80007F800013D805FE00000FE7FFF00000037FFFFE000001BFFCF0000001CF3BF0000001B\
    7F4E000000193E9E0000001EF73E00000019CBDE0000001F94FF8000006E413E4000009D80FFA000\
    037FFFFFD0000CEC00E3CC0013DFFFF3F600672FFFFFF9009EC3807E1E80790C7F81EF00F601007E\
    1380C80000000D80B000000002004000000001808000000000003FFFFFFFFE000000000000003FFF\
    FFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE00";

/// Header logo, C Pro labels
const PRO_HEAD: &str = "^GFA,234,234,6,\
    004FFFF90000013FFFFE4000027FFFFF200005FFC1FFD0000BFC7F1FE80017F3C1E7F4000FCC0019\
    F8003FB00006FE001F4000017C007E800000BF003D0000005E00FE0000003F80780000000F00FC00\
    00001F80F0001C000780F80022000F80F0003E000780F0007F000780E0007F000380E0007F000380\
    E0007F000380F0007F000780F0003E000780F80022000F80F0001C000780FC0000001F8078000000\
    0F00FE0000003F803D0000005E007E800000BF001F4000037C003FB00006FE000FCC0019F80017F3\
    C1E7F4000BFC7F1FE80005FFC1FFD000027FFFFF2000013FFFFE40000047FFF10000";

/// Conformity mark, C Pro labels
const PRO_MARK: &str = "^GFA,234,234,6,\
    003FA000BF8002FFA000FF8005FFA005FF801BFFA00BFF8017FFA017FF802FFFA02FFF805FFC002F\
    FF809FEF005FF400BFDC00DFDF80BFE000BFB0007F4000BFE0007E80017F4000FE80017E8000FD00\
    017E8000FD00017EFC00FD00017D0000FC0002FFFC00FA0002FFFC80FA0002FFFC80FA0002FFFC80\
    FA0002FFFC80F80002FFFC80FC00017FFC00FD00017D0000FD00017E8000FD00017EF800FE80017E\
    80007E80017F40007F4000BF60007FE000BFB000BFD8005FDC00BFEF005FF7805FFA002FFE006FFF\
    A02FFF802FFFA017FF8017FFA00BFF800BFFA005FF8001FFA000FF80007FA000BF80";

/// Info glyph, C Pro labels
const PRO_INFO: &str = "^GFA,234,234,6,\
    D00180000D80E4303F0F138073CFFFF0EF009C3FFFFF1E804FFFFFFFF90013FFFFFFF600097FFFFF\
    C80002F80007F000003C801FC000005F7FFFC0000017FFFC0000001BEDCFC000001CF3BC0000001B\
    7F5C000000193E9C0000001EFF3C00000019E3DC0000003F9CFE0000004F2279000001BCC07E8000\
    027FFFFF40000DEC01C39000139FFFE7C8006F6FFFFF72009C80003CB9007B0CFFC34E00E4030038\
    2780C80000000B803000000004804000000001000000000000003FFFFFFFFE000000000000003FFF\
    FFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE003FFFFFFFFE00";

/// Header logo, accessory labels
const ACCESSORY_HEAD: &str = "^GFA,246,246,6,\
    0001FFC00000000FFFF80000003FFFFE0000007F80FF000001FC001FC00003F00007E00007C00001\
    F0000F800000F8000F00000078001E0000003C003C0000001E003C0000001E00780000000F007800\
    00000F00700000000700F00000000780F00000000780E0001C000380E0003E000380E0007F000380\
    E0007F000380E0007F000380E0003E000380E0001C000380F00000000780F0000000078070000000\
    0700780000000F00780000000F003C0000001E003C0000001E001E0000003C000F00000078000F80\
    0000F80007C00001F00003F00007E00001FC001FC000007F80FF0000003FFFFE0000000FFFF80000\
    0001FFC00000";

/// Conformity mark, accessory labels
const ACCESSORY_MARK: &str = "^GFA,480,480,8,\
    00000000000000000000000000000000000000000000000000000000000000000000000000000000\
    00000000000000000000000000000000000000000000000000000000000000000000FF0000001FF0\
    0007FF0000007FF0001FFF000001FFF0003FFF000007FFF000FFFF00000FFFF001FFFF00001FFFF0\
    03FFFA00003FFFF007FF0000007FF8000FFC000000FFC0000FF8000001FF80001FE0000001FF0000\
    3FC0000003FE00003FC0000003FC00003F80000003F800007F00000007F000007F00000007F00000\
    7F00000007F00000FE00000007E00000FE0000000FFFFE00FE0000000FFFFE00FE0000000FFFFE00\
    FE0000000FFFFE00FE0000000FFFFE00FE0000000FFFFE00FE00000007FFFE00FF00000007E00000\
    7F00000007F000007F00000007F000007F80000003F800003FC0000003FC00003FE0000001FC0000\
    1FE0000001FE00001FF8000000FF80000FFC000000FFC00007FF0000007FF00003FFFE00003FFFA0\
    01FFFF00001FFFF000FFFF00000FFFF0007FFF000007FFF0001FFF000001FFF00007FF0000007FF0\
    0001FF0000001FF00000000000000000000000000000000000000000000000000000000000000000\
    00000000000000000000000000000000000000000000000000000000000000000000000000000000";

/// Info glyph, accessory labels
const ACCESSORY_INFO: &str = "^GFA,480,480,8,\
    000000000000000000100000000080000018000000018000000C0000000300000004003F80060000\
    000207F0F80C000000010FDFC79800000000BDFFFFF0000000003FFFFFF0000000000FFFFFE00000\
    00000E0003C0000000000E0003C0000000000600034000000000060007C00000000007000E000000\
    0000059FF6000000000004FFF6000000000004602600000000000470460000000000043886000000\
    0000021D060000000000020E040000000000020E040000000000021F04000000000002398C000000\
    00000270CC000000000002606C000000000002C03C000000000003801C000000000003000C000000\
    000007003E00000000000F007300000000001B006180000000003300618000000000630061C00000\
    0000C1FFF3500000000180C01E100000000100000018000000020000000C00000004000000060000\
    00080000000300000018000000010000001000000000800000000000000000000000000000000000\
    00000000000000000000000000000000000000000000000000000000000000000000000000000000\
    00000000000000000007FFFFFFFE00000007FFFFFFFE00000007FFFFFFFE00000007FFFFFFFE0000\
    0007FFFFFFFE00000007FFFFFFFE00000007FFFFFFFE00000007FFFFFFFE00000007FFFFFFFC0000";

static CLASSIC: LazyLock<Result<IconSet, EncodingError>> =
    LazyLock::new(|| IconSet::parse(CLASSIC_HEAD, CLASSIC_MARK, CLASSIC_INFO));
static PRO: LazyLock<Result<IconSet, EncodingError>> =
    LazyLock::new(|| IconSet::parse(PRO_HEAD, PRO_MARK, PRO_INFO));
static ACCESSORY: LazyLock<Result<IconSet, EncodingError>> =
    LazyLock::new(|| IconSet::parse(ACCESSORY_HEAD, ACCESSORY_MARK, ACCESSORY_INFO));

/// Icon set printed on a variant
///
/// C2 and outer carton labels carry no icons.
pub fn icons_for(variant: Variant) -> Option<Result<&'static IconSet, EncodingError>> {
    let set = match variant {
        Variant::CBasic | Variant::CameraHead => &CLASSIC,
        Variant::CPro => &PRO,
        Variant::Accessory => &ACCESSORY,
        Variant::C2 | Variant::OuterCarton => return None,
    };
    Some(match LazyLock::force(set) {
        Ok(icons) => Ok(icons),
        Err(e) => Err(e.clone()),
    })
}
