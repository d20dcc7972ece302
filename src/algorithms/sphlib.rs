//! Primitives from sphlib 3.0, compiled by `build.rs` when the `sphlib`
//! feature is enabled.
//!
//! Every context is driven through the init/update/close triple with an opaque
//! buffer large enough for the biggest sph 512-bit context.

use super::{truncate, Digest};

pub mod wide {
    use crate::algorithms::{WideDigest, WIDE_DIGEST_LEN};
    use std::ffi::c_void;

    /// Opaque storage for any `sph_*512_context` (the largest is under 400 bytes)
    #[repr(C, align(16))]
    struct SphContext([u8; 1024]);

    impl SphContext {
        fn new() -> Self {
            Self([0u8; 1024])
        }

        fn as_mut_ptr(&mut self) -> *mut c_void {
            self.0.as_mut_ptr().cast()
        }
    }

    macro_rules! sph_primitive {
        ($name:ident, $init:ident, $update:ident, $close:ident) => {
            extern "C" {
                fn $init(cc: *mut c_void);
                fn $update(cc: *mut c_void, data: *const c_void, len: usize);
                fn $close(cc: *mut c_void, dst: *mut c_void);
            }

            pub fn $name(data: &[u8]) -> WideDigest {
                let mut ctx = SphContext::new();
                let mut out = [0u8; WIDE_DIGEST_LEN];
                // SAFETY: `ctx` outlives the three calls and is larger than the
                // context struct; `data` and `out` match the lengths passed.
                unsafe {
                    $init(ctx.as_mut_ptr());
                    $update(ctx.as_mut_ptr(), data.as_ptr().cast(), data.len());
                    $close(ctx.as_mut_ptr(), out.as_mut_ptr().cast());
                }
                out
            }
        };
    }

    sph_primitive!(bmw, sph_bmw512_init, sph_bmw512, sph_bmw512_close);
    sph_primitive!(luffa, sph_luffa512_init, sph_luffa512, sph_luffa512_close);
    sph_primitive!(shavite, sph_shavite512_init, sph_shavite512, sph_shavite512_close);
    sph_primitive!(simd, sph_simd512_init, sph_simd512, sph_simd512_close);
    sph_primitive!(echo, sph_echo512_init, sph_echo512, sph_echo512_close);
    sph_primitive!(hamsi, sph_hamsi512_init, sph_hamsi512, sph_hamsi512_close);
    sph_primitive!(fugue, sph_fugue512_init, sph_fugue512, sph_fugue512_close);
}

chain_primitives! {
    bmw => wide::bmw,
    luffa => wide::luffa,
    shavite => wide::shavite,
    simd => wide::simd,
    echo => wide::echo,
    hamsi => wide::hamsi,
    fugue => wide::fugue,
}
