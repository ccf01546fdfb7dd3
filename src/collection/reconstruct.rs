use crate::{
    convert::BoxedValue,
    core::record::{Header, Row},
    error::{MapperError, StructuralError},
};

use super::CollectionShape;

/// A rebuilt collection and the number of item columns it consumed.
///
/// The caller advances its column cursor by `consumed`, which lets sibling
/// columns follow a collection of any length.
pub struct Reconstructed {
    pub value: BoxedValue,
    pub consumed: usize,
}

/// Parses the index of an item column, e.g. `item12` with prefix `item` is 12.
pub(crate) fn item_index(name: &str, item_name: &str) -> Option<usize> {
    let digits = name.strip_prefix(item_name)?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Counts the item columns of one collection starting at `start`.
///
/// The run is `item1, item2, ...` with no gap. A column without the prefix or
/// without a numeric suffix ends the run, as does an index restarting at 1.
/// Any other index is out of sequence. Plans never place a column the scan
/// would accept right after a collection, so the end of a run is unambiguous.
///
/// # Examples
///
/// ```
/// use csv_mapper::collection::scan_items;
///
/// let header = ["item1", "item2", "count"];
/// assert_eq!(scan_items(&header, 0, "item"), Ok(2));
/// assert_eq!(scan_items(&header, 2, "item"), Ok(0));
/// assert!(scan_items(&["item1", "item3"], 0, "item").is_err());
/// ```
pub fn scan_items<S: AsRef<str>>(
    header: &[S],
    start: usize,
    item_name: &str,
) -> Result<usize, StructuralError> {
    let mut count = 0;

    for (column, name) in header.iter().enumerate().skip(start) {
        let name = name.as_ref();
        let Some(index) = item_index(name, item_name) else {
            break;
        };

        if index == count + 1 {
            count += 1;
        } else if index == 1 {
            break;
        } else {
            return Err(StructuralError::OutOfSequence {
                column,
                found: name.to_string(),
                expected_index: count + 1,
            });
        }
    }

    Ok(count)
}

/// Rebuilds the collection whose item columns start at `start`.
///
/// Every item column is converted with the element codec before the container
/// is finished; the first failure aborts and nothing partial is returned.
pub fn reconstruct(
    shape: &CollectionShape,
    header: &Header,
    row: &Row,
    start: usize,
    item_name: &str,
) -> Result<Reconstructed, MapperError> {
    let count = scan_items(header.names(), start, item_name)?;
    let mut builder = shape.begin(count);

    for offset in 0..count {
        let column = start + offset;
        let text = row.get(column).ok_or_else(|| StructuralError::MissingColumn {
            column,
            expected: format!("{item_name}{}", offset + 1),
        })?;

        let item = shape
            .element()
            .read(text)
            .ok_or_else(|| MapperError::FieldConversion {
                column,
                header: header.names()[column].clone(),
                type_name: shape.element().type_name(),
                text: text.to_string(),
            })?;

        if !builder.put(offset, item) {
            return Err(MapperError::configuration(
                shape.type_name(),
                "element converter produced a value of another type",
            ));
        }
    }

    Ok(Reconstructed {
        value: builder.finish()?,
        consumed: count,
    })
}
