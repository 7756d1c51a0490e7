use crate::dataset::Proyecto;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

const ENCABEZADOS: [&str; 15] = [
    "ID",
    "Municipio",
    "Departamento",
    "Tipo de proyecto",
    "Comunidad beneficiaria",
    "Fecha inicio",
    "Fecha fin",
    "Costo total ($COP)",
    "Beneficiarios directos",
    "Beneficiarios indirectos",
    "Beneficiarios totales",
    "Área intervenida (ha)",
    "Entidad financiadora",
    "Duración del proyecto (meses)",
    "Producto principal generado",
];

/// Download of the currently filtered rows, same column layout as the
/// source workbook plus the derived totals column.
pub fn export_proyectos_xlsx(proyectos: &[&Proyecto]) -> ResultResp {
    let buffer = workbook_bytes(proyectos)?;
    xlsx_response(buffer, "proyectos_filtrados.xlsx")
}

pub fn workbook_bytes(proyectos: &[&Proyecto]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in ENCABEZADOS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write header '{header}': {e}")))?;
    }

    for (i, &p) in proyectos.iter().enumerate() {
        let r = (i + 1) as u32;
        escribir_fila(worksheet, r, p)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write row {r}: {e}")))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

fn escribir_fila(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    r: u32,
    p: &Proyecto,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    worksheet.write_string(r, 0, &p.id)?;
    worksheet.write_string(r, 1, &p.municipio)?;
    worksheet.write_string(r, 2, &p.departamento)?;
    worksheet.write_string(r, 3, &p.tipo_proyecto)?;
    worksheet.write_string(r, 4, &p.comunidad)?;
    worksheet.write_string(r, 5, &p.fecha_inicio.format("%Y-%m-%d").to_string())?;
    worksheet.write_string(r, 6, &p.fecha_fin.format("%Y-%m-%d").to_string())?;
    worksheet.write_number(r, 7, p.costo_total)?;
    worksheet.write_number(r, 8, p.beneficiarios_directos as f64)?;
    worksheet.write_number(r, 9, p.beneficiarios_indirectos as f64)?;
    worksheet.write_number(r, 10, p.beneficiarios_totales as f64)?;
    worksheet.write_number(r, 11, p.area_intervenida)?;
    worksheet.write_string(r, 12, &p.entidad_financiadora)?;
    worksheet.write_number(r, 13, p.duracion_meses)?;
    worksheet.write_string(r, 14, &p.producto_principal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::proyecto;

    #[test]
    fn workbook_serializes_to_a_zip_container() {
        let p1 = proyecto("1", "BOGOTÁ", "CUNDINAMARCA", "Reforestación", 2020, 100.0);
        let p2 = proyecto("2", "LETICIA", "AMAZONAS", "Apicultura", 2021, 200.0);
        let bytes = workbook_bytes(&[&p1, &p2]).unwrap();

        assert!(!bytes.is_empty());
        // xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_filter_result_still_produces_a_sheet() {
        let bytes = workbook_bytes(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
