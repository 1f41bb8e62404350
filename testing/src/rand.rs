use rand::RngCore;
use std::{
    iter::Cycle,
    vec::IntoIter,
};

pub struct MockRng {
    cycle: Cycle<IntoIter<u8>>,
}

impl MockRng {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let cycle = data.into()
            .into_iter()
            .cycle();
        Self { cycle }
    }

    pub fn next(&mut self) -> u8 {
        self.cycle
            .next()
            .unwrap_or(0)
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        u32::from(self.next()) << 24 |
        u32::from(self.next()) << 16 |
        u32::from(self.next()) << 8 |
        u32::from(self.next())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) << 32 |
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.iter_mut()
            .for_each(|x| *x = self.next())
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
