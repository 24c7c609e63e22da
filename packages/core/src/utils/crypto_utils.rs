// Вспомогательные функции для работы с байтами

use subtle::ConstantTimeEq;

/// Сравнение за постоянное время. Разная длина даёт `false`.
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Копия `data` с инвертированным младшим битом байта `index`.
/// Для пустых данных или индекса за границей возвращает неизменённую копию.
pub fn flip_low_bit(data: &[u8], index: usize) -> Vec<u8> {
    let mut corrupted = data.to_vec();
    if let Some(byte) = corrupted.get_mut(index) {
        *byte ^= 1;
    }
    corrupted
}
